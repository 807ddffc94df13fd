//! Structured logging infrastructure for Rewind

use crate::{Result, RewindError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human oriented output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = RewindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(RewindError::validation_field(
                format!("unknown log format '{other}' (expected pretty, compact or json)"),
                "logging.format",
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "rewind_engine=trace")
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter: `RUST_LOG` wins, then the configured level, then `info`.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// Log lines go to stderr so command output on stdout stays parseable.
/// Fails if a global subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(fmt_layer::layer().pretty().with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt_layer::layer().compact().with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt_layer::layer().json().with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| RewindError::with_source("Failed to install tracing subscriber", e))
}
