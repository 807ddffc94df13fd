//! Server error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rewind_common::RewindError;
use rewind_engine::{UnknownViewMode, ViewMode};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body returned for every failed data request.
pub const DATA_FAILURE_MESSAGE: &str = "Failed to process data";

/// Result type alias for server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors raised while serving requests or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Configured bind address
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The server loop stopped with an I/O error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// A view selector that names no view
    #[error(transparent)]
    UnknownView(#[from] UnknownViewMode),

    /// Loading or processing the history failed
    #[error(transparent)]
    Rewind(#[from] RewindError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::UnknownView(err) => {
                let valid: Vec<&str> = ViewMode::ALL.iter().map(|mode| mode.as_str()).collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": err.to_string(), "valid_modes": valid })),
                )
                    .into_response()
            }
            other => {
                error!("Error processing data: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": DATA_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
