//! # Rewind Common
//!
//! Shared types, utilities, and common functionality for Rewind.
//!
//! This crate provides the error type, the raw and normalized play-event
//! types, logging bootstrap and duration formatting used across all other
//! crates in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, RewindError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
