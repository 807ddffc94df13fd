//! Default values for every configuration section.

use crate::schema::*;
use rewind_common::LoggingConfig;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// First year of the default series window.
pub const DEFAULT_BASE_YEAR: i32 = 2014;

/// Width of the default series window (2014 through 2024).
pub const DEFAULT_YEAR_SPAN: usize = 11;

/// Widest series window accepted by validation.
pub const MAX_YEAR_SPAN: usize = 200;

/// Artist excluded from the time-of-day view unless configured otherwise.
pub const DEFAULT_EXCLUDED_ARTIST: &str = "The Weeknd";

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            files: (0..5).map(|i| format!("data{i}.json")).collect(),
        }
    }
}

impl Default for TopLimits {
    fn default() -> Self {
        Self {
            seasonal_chart_artists: 5,
            seasonal_cell_artists: 5,
            popularity_chart_tracks: 10,
            popularity_cell_tracks: 5,
            summary_artists: 10,
            summary_tracks: 15,
            summary_albums: 10,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            year_span: DEFAULT_YEAR_SPAN,
            excluded_time_of_day_artists: vec![DEFAULT_EXCLUDED_ARTIST.to_string()],
            missing_artist_tracks: MissingArtistPolicy::default(),
            timezone: None,
            limits: TopLimits::default(),
        }
    }
}
