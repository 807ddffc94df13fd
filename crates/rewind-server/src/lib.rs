//! # Rewind Server
//!
//! Serves the merged listening history, computed views and the static
//! client over HTTP.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod error;
pub mod history;

pub use api::*;
pub use error::*;
pub use history::*;
