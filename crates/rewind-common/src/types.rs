//! Raw export records and the normalized play events built from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One record of a streaming-history export, exactly as the export spells it.
///
/// Every field is optional and tolerant of the wrong JSON type: a string
/// field holding a number reads as absent instead of failing the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlayRecord {
    /// Play start, usually an ISO-8601 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<Value>,
    /// Playback duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms_played: Option<Value>,
    /// Track title.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub master_metadata_track_name: Option<String>,
    /// Album artist.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub master_metadata_album_artist_name: Option<String>,
    /// Album title.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub master_metadata_album_album_name: Option<String>,
    /// Podcast episode title.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub episode_name: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Whether a play was music or a podcast episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    /// Anything that is not a podcast episode.
    Music,
    /// A play carrying an episode name.
    Podcast,
}

impl ContentType {
    /// Both content types in display order.
    pub const ALL: [Self; 2] = [Self::Music, Self::Podcast];

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Music => "Music",
            Self::Podcast => "Podcast",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized play event.
///
/// Optional metadata is `None` when the export had it missing, `null`,
/// empty, or of the wrong type. The timestamp is kept as text; turning it
/// into calendar buckets is the classifier's job, and a record whose
/// timestamp cannot be read still exists as an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Raw timestamp text, if the record had one.
    pub timestamp: Option<String>,
    /// Playback duration in milliseconds.
    pub ms_played: u64,
    /// Track title.
    pub track_name: Option<String>,
    /// Album artist.
    pub artist_name: Option<String>,
    /// Album title.
    pub album_name: Option<String>,
    /// Podcast episode title.
    pub episode_name: Option<String>,
}

impl PlayEvent {
    /// Creates an event with a timestamp and duration and no metadata.
    pub fn new(timestamp: impl Into<String>, ms_played: u64) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            ms_played,
            ..Self::default()
        }
    }

    /// Sets the track title.
    #[must_use]
    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track_name = Some(track.into());
        self
    }

    /// Sets the album artist.
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_name = Some(artist.into());
        self
    }

    /// Sets the album title.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album_name = Some(album.into());
        self
    }

    /// Sets the podcast episode title.
    #[must_use]
    pub fn with_episode(mut self, episode: impl Into<String>) -> Self {
        self.episode_name = Some(episode.into());
        self
    }

    /// Podcast when an episode name is present, Music otherwise.
    pub const fn content_type(&self) -> ContentType {
        if self.episode_name.is_some() {
            ContentType::Podcast
        } else {
            ContentType::Music
        }
    }

    /// `"<track> by <artist>"` when both halves are present.
    pub fn track_with_artist(&self) -> Option<String> {
        match (&self.track_name, &self.artist_name) {
            (Some(track), Some(artist)) => Some(track_key(track, artist)),
            _ => None,
        }
    }
}

/// Builds the composite key used for track rankings.
pub fn track_key(track: &str, artist: &str) -> String {
    format!("{track} by {artist}")
}
