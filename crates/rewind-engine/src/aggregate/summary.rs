//! All-time listening summary.

use super::time_of_day::{zeroed_periods, PeriodTotals};
use super::{classify_event, ViewAggregator};
use crate::ranking::{RankedEntry, Tally};
use crate::temporal::TemporalClassifier;
use rewind_common::{track_key, PlayEvent};
use rewind_config::{AnalysisConfig, MissingArtistPolicy, TopLimits};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Totals and top lists over the whole history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListeningSummary {
    /// Playback over every year.
    pub total_ms: u64,
    /// Playback per calendar year.
    pub by_year: BTreeMap<i32, u64>,
    /// Most played artists.
    pub top_artists: Vec<RankedEntry>,
    /// Most played tracks, keyed `"<track> by <artist>"`.
    pub top_tracks: Vec<RankedEntry>,
    /// Most played albums.
    pub top_albums: Vec<RankedEntry>,
    /// Playback per period, no artist excluded.
    pub time_of_day: PeriodTotals,
    /// Plays dropped for an unreadable timestamp.
    pub skipped_events: usize,
}

/// Builds [`ListeningSummary`].
#[derive(Debug, Clone)]
pub struct SummaryAggregator {
    limits: TopLimits,
    missing_artist: MissingArtistPolicy,
}

impl SummaryAggregator {
    /// Creates an aggregator.
    pub const fn new(limits: TopLimits, missing_artist: MissingArtistPolicy) -> Self {
        Self {
            limits,
            missing_artist,
        }
    }

    /// Creates an aggregator from the analysis settings.
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.limits, config.missing_artist_tracks)
    }

    fn track_name(&self, event: &PlayEvent) -> Option<String> {
        let track = event.track_name.as_deref()?;
        match (event.artist_name.as_deref(), self.missing_artist) {
            (Some(artist), _) => Some(track_key(track, artist)),
            (None, MissingArtistPolicy::Exclude) => None,
            (None, MissingArtistPolicy::Blank) => Some(track_key(track, "")),
            (None, MissingArtistPolicy::Literal) => Some(track_key(track, "undefined")),
        }
    }
}

impl Default for SummaryAggregator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

struct SummaryFold {
    total_ms: u64,
    by_year: BTreeMap<i32, u64>,
    artists: Tally,
    tracks: Tally,
    albums: Tally,
    time_of_day: PeriodTotals,
    skipped: usize,
}

impl ViewAggregator for SummaryAggregator {
    type Output = ListeningSummary;

    #[instrument(skip_all, fields(events = events.len()))]
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> ListeningSummary {
        let initial = SummaryFold {
            total_ms: 0,
            by_year: BTreeMap::new(),
            artists: Tally::new(),
            tracks: Tally::new(),
            albums: Tally::new(),
            time_of_day: zeroed_periods(),
            skipped: 0,
        };

        let fold = events.iter().fold(initial, |mut acc, event| {
            let Some(key) = classify_event(event, classifier) else {
                acc.skipped += 1;
                return acc;
            };
            let ms = event.ms_played;

            acc.total_ms = acc.total_ms.saturating_add(ms);
            let year = acc.by_year.entry(key.year).or_insert(0);
            *year = year.saturating_add(ms);
            let period = acc.time_of_day.entry(key.period).or_insert(0);
            *period = period.saturating_add(ms);

            if let Some(artist) = event.artist_name.as_deref() {
                acc.artists.add(artist, ms);
            }
            if let Some(track) = self.track_name(event) {
                acc.tracks.add(&track, ms);
            }
            if let Some(album) = event.album_name.as_deref() {
                acc.albums.add(album, ms);
            }
            acc
        });

        debug!(
            artists = fold.artists.len(),
            tracks = fold.tracks.len(),
            albums = fold.albums.len(),
            skipped = fold.skipped,
            "Built listening summary"
        );

        ListeningSummary {
            total_ms: fold.total_ms,
            by_year: fold.by_year,
            top_artists: fold.artists.top(self.limits.summary_artists),
            top_tracks: fold.tracks.top(self.limits.summary_tracks),
            top_albums: fold.albums.top(self.limits.summary_albums),
            time_of_day: fold.time_of_day,
            skipped_events: fold.skipped,
        }
    }

    fn name(&self) -> &'static str {
        "summary"
    }
}
