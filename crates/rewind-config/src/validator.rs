//! Runtime validation of a loaded configuration.

use crate::defaults::MAX_YEAR_SPAN;
use crate::loader::ConfigError;
use crate::schema::Config;
use chrono_tz::Tz;
use rewind_common::RewindError;

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(invalid("bind address cannot be empty", "server.bind_address"));
        }

        if self.data.files.is_empty() {
            return Err(invalid("at least one data file is required", "data.files"));
        }

        if self.data.files.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid("data file names cannot be empty", "data.files"));
        }

        if self.analysis.year_span == 0 {
            return Err(invalid("year span must be at least 1", "analysis.year_span"));
        }

        if self.analysis.year_span > MAX_YEAR_SPAN {
            return Err(invalid(
                format!("year span cannot exceed {MAX_YEAR_SPAN}"),
                "analysis.year_span",
            ));
        }

        if let Some(zone) = &self.analysis.timezone {
            zone.parse::<Tz>()
                .map_err(|_| invalid(format!("unknown timezone '{zone}'"), "analysis.timezone"))?;
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("log level cannot be empty", "logging.level"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>, field: &str) -> ConfigError {
    ConfigError::Validation(RewindError::validation_field(message, field))
}
