//! Test utilities and shared test helpers for Rewind.
//!
//! Fixtures for raw export records and normalized play events, a once-only
//! test logger, and proptest strategies shared by the crates' test suites.

use crate::PlayEvent;
use serde_json::{json, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// An ISO-8601 UTC timestamp on the hour, in the export's spelling.
pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:00:00Z")
}

/// Normalized play-event fixtures.
pub mod event_fixtures {
    use super::*;

    /// A music play attributed to an artist only.
    pub fn artist_play(timestamp: &str, ms_played: u64, artist: &str) -> PlayEvent {
        PlayEvent::new(timestamp, ms_played).with_artist(artist)
    }

    /// A fully tagged music play.
    pub fn track_play(
        timestamp: &str,
        ms_played: u64,
        track: &str,
        artist: &str,
        album: &str,
    ) -> PlayEvent {
        PlayEvent::new(timestamp, ms_played)
            .with_track(track)
            .with_artist(artist)
            .with_album(album)
    }

    /// A podcast episode play.
    pub fn podcast_play(timestamp: &str, ms_played: u64, episode: &str) -> PlayEvent {
        PlayEvent::new(timestamp, ms_played).with_episode(episode)
    }

    /// A small history spanning several years, seasons and periods.
    pub fn sample_history() -> Vec<PlayEvent> {
        vec![
            track_play(&ts(2019, 12, 24, 22), 200_000, "Silent Night", "Choir", "Carols"),
            track_play(&ts(2020, 1, 15, 10), 60_000, "Intro", "A", "First"),
            track_play(&ts(2020, 1, 20, 10), 120_000, "Intro", "A", "First"),
            track_play(&ts(2020, 4, 2, 14), 90_000, "Bloom", "B", "Second"),
            track_play(&ts(2020, 7, 9, 3), 45_000, "Heat", "C", "Third"),
            podcast_play(&ts(2020, 10, 31, 19), 1_800_000, "Episode 1"),
            track_play(&ts(2021, 6, 1, 20), 30_000, "Bloom", "B", "Second"),
            artist_play(&ts(2021, 9, 12, 8), 15_000, "A"),
            PlayEvent::new(ts(2022, 3, 3, 13), 5_000),
            PlayEvent::new("not a timestamp", 7_000).with_artist("Ghost"),
        ]
    }
}

/// Raw export JSON fixtures.
pub mod raw_fixtures {
    use super::*;

    /// One export record; `None` fields are written as JSON `null`.
    pub fn raw_record(
        timestamp: &str,
        ms_played: u64,
        track: Option<&str>,
        artist: Option<&str>,
        album: Option<&str>,
        episode: Option<&str>,
    ) -> Value {
        json!({
            "ts": timestamp,
            "ms_played": ms_played,
            "master_metadata_track_name": track,
            "master_metadata_album_artist_name": artist,
            "master_metadata_album_album_name": album,
            "episode_name": episode,
        })
    }

    /// A short export shard as a JSON array.
    pub fn sample_shard() -> Value {
        Value::Array(vec![
            raw_record(&ts(2020, 1, 15, 10), 60_000, Some("Intro"), Some("A"), Some("First"), None),
            raw_record(&ts(2020, 1, 20, 10), 120_000, Some("Intro"), Some("A"), Some("First"), None),
            raw_record(&ts(2021, 6, 1, 20), 30_000, Some("Bloom"), Some("B"), Some("Second"), None),
            raw_record(&ts(2021, 6, 2, 7), 1_200_000, None, None, None, Some("Episode 1")),
        ])
    }
}

/// Property-based testing utilities using proptest.
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    const ARTISTS: [&str; 5] = ["A", "B", "C", "D", "The Weeknd"];
    const TRACKS: [&str; 4] = ["One", "Two", "Three", "Four"];

    fn optional_name(pool: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(pool).prop_map(str::to_string))
    }

    /// Strategy for timestamps, mostly valid, spanning 2012-2026.
    pub fn timestamp_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            8 => (2012i32..=2026, 1u32..=12, 1u32..=28, 0u32..24)
                .prop_map(|(y, m, d, h)| Some(ts(y, m, d, h))),
            1 => Just(Some("garbage".to_string())),
            1 => Just(None),
        ]
    }

    /// Strategy for normalized play events with colliding names.
    pub fn play_event_strategy() -> impl Strategy<Value = PlayEvent> {
        (
            timestamp_strategy(),
            0u64..5_000_000,
            optional_name(&TRACKS),
            optional_name(&ARTISTS),
            optional_name(&TRACKS),
            prop::option::weighted(0.2, Just("Episode".to_string())),
        )
            .prop_map(|(timestamp, ms_played, track_name, artist_name, album_name, episode_name)| {
                PlayEvent {
                    timestamp,
                    ms_played,
                    track_name,
                    artist_name,
                    album_name,
                    episode_name,
                }
            })
    }

    /// Strategy for a history of up to `max_len` events.
    pub fn history_strategy(max_len: usize) -> impl Strategy<Value = Vec<PlayEvent>> {
        prop::collection::vec(play_event_strategy(), 0..max_len)
    }
}
