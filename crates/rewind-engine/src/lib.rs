//! # Rewind Engine
//!
//! Turns a streaming-history export into the five listening views.
//!
//! Raw records are normalized into play events, bucketed by year, season
//! and time of day, folded into per-view aggregates, and finally rendered
//! into chart series and list sections.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod normalize;
pub mod present;
pub mod ranking;
pub mod temporal;
pub mod view;

pub use aggregate::*;
pub use normalize::*;
pub use present::*;
pub use ranking::*;
pub use temporal::*;
pub use view::*;
