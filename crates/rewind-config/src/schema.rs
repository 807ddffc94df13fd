//! Configuration schema definitions using serde.

use rewind_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Rewind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// History export location.
    pub data: DataConfig,
    /// Aggregation settings.
    pub analysis: AnalysisConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, `host:port`.
    pub bind_address: String,
    /// Directory of client assets served as the fallback route.
    pub static_dir: PathBuf,
}

/// Location of the history export shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the shards.
    pub directory: PathBuf,
    /// Shard file names, merged in this order.
    pub files: Vec<String>,
}

impl DataConfig {
    /// Full paths of the shards, in merge order.
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| self.directory.join(f)).collect()
    }
}

/// How the all-time summary keys a track whose artist is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArtistPolicy {
    /// Leave the play out of the track ranking.
    #[default]
    Exclude,
    /// Key it as `"<track> by "`.
    Blank,
    /// Key it as `"<track> by undefined"`.
    Literal,
}

/// Top-N sizes for each ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopLimits {
    /// Artists in the seasonal multi-series chart.
    pub seasonal_chart_artists: usize,
    /// Artists listed per year and season.
    pub seasonal_cell_artists: usize,
    /// Tracks in the all-time popularity chart.
    pub popularity_chart_tracks: usize,
    /// Tracks listed per year and season.
    pub popularity_cell_tracks: usize,
    /// Artists in the all-time summary.
    pub summary_artists: usize,
    /// Tracks in the all-time summary.
    pub summary_tracks: usize,
    /// Albums in the all-time summary.
    pub summary_albums: usize,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// First year of the fixed-width yearly series.
    pub base_year: i32,
    /// Number of years in the fixed-width yearly series.
    pub year_span: usize,
    /// Artists left out of the time-of-day view. The default entry looks
    /// like a leftover from debugging; set an empty list to disable it.
    pub excluded_time_of_day_artists: Vec<String>,
    /// Summary track key for plays without an artist.
    pub missing_artist_tracks: MissingArtistPolicy,
    /// IANA zone to bucket instants in; `None` uses each timestamp as written.
    pub timezone: Option<String>,
    /// Top-N sizes.
    pub limits: TopLimits,
}
