//! Error types and utilities for Rewind

use thiserror::Error;

/// Result type alias for Rewind operations
pub type Result<T> = std::result::Result<T, RewindError>;

/// Main error type for Rewind operations
#[derive(Error, Debug)]
pub enum RewindError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A play record carried a timestamp that could not be read as an instant
    #[error("Invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// The history export could not be loaded from its source
    #[error("Failed to load history data from {source_name}: {message}")]
    DataLoad {
        source_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RewindError {
    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// Create a new data load error for the named source
    pub fn data_load(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DataLoad {
            source_name: source_name.into(),
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new data load error with the underlying cause
    pub fn data_load_with_source(
        source_name: impl Into<String>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataLoad {
            source_name: source_name.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error came from loading the history export
    pub const fn is_data_load(&self) -> bool {
        matches!(self, Self::DataLoad { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let ts_error = RewindError::invalid_timestamp("not-a-date");
        assert_eq!(ts_error.to_string(), "Invalid timestamp: \"not-a-date\"");

        let validation_error = RewindError::validation_field("must be positive", "year_span");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("must be positive"));
        assert!(matches!(
            validation_error,
            RewindError::Validation { field: Some(ref f), .. } if f == "year_span"
        ));
    }

    #[test]
    fn test_data_load_error() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "missing");
        let error = RewindError::data_load_with_source("data/data0.json", "read failed", cause);

        assert!(error.is_data_load());
        assert_eq!(
            error.to_string(),
            "Failed to load history data from data/data0.json: read failed"
        );
        assert!(error.source().is_some());

        assert!(!RewindError::invalid_timestamp("x").is_data_load());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = RewindError::config_with_source("Middle layer", root_error);
        let top_error = RewindError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
        assert!(top_error.to_string().contains("Top layer"));
    }
}
