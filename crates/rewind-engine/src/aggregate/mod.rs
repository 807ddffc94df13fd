//! Aggregate builders over normalized play events.
//!
//! Each view has an aggregator that folds the event slice once into a
//! fresh accumulator and finishes it into a serializable result. Events
//! whose timestamp cannot be classified are dropped and counted.

use crate::ranking::{rank_by, RankedEntry, Tally};
use crate::temporal::{Period, Season, TemporalClassifier, TemporalKey};
use rewind_common::PlayEvent;
use rewind_config::AnalysisConfig;
use serde::Serialize;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::trace;

pub mod content;
pub mod popularity;
pub mod seasonal;
pub mod summary;
pub mod time_of_day;

pub use content::*;
pub use popularity::*;
pub use seasonal::*;
pub use summary::*;
pub use time_of_day::*;

/// Trait for folding play events into one view's aggregate.
pub trait ViewAggregator {
    /// The aggregate this view produces.
    type Output;

    /// Folds `events` into a fresh aggregate.
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> Self::Output;

    /// Name of the view, for logs.
    fn name(&self) -> &'static str;
}

/// The fixed run of years that yearly series are laid out over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWindow {
    /// First year of the window.
    pub base_year: i32,
    /// Number of years.
    pub span: usize,
}

impl YearWindow {
    /// Creates a window of `span` years starting at `base_year`.
    pub const fn new(base_year: i32, span: usize) -> Self {
        Self { base_year, span }
    }

    /// The window configured in the analysis settings.
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.base_year, config.year_span)
    }

    /// Slot of `year` in the window.
    pub fn index_of(&self, year: i32) -> Option<usize> {
        let offset = usize::try_from(i64::from(year) - i64::from(self.base_year)).ok()?;
        (offset < self.span).then_some(offset)
    }

    /// Whether `year` has a slot.
    pub fn contains(&self, year: i32) -> bool {
        self.index_of(year).is_some()
    }

    /// The window's years in order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.span).map_while(move |offset| {
            i32::try_from(offset)
                .ok()
                .and_then(|offset| self.base_year.checked_add(offset))
        })
    }

    /// A zeroed series with one slot per year.
    pub fn empty_series(&self) -> Vec<u64> {
        vec![0; self.span]
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// A fixed set of buckets every year of a table is seeded with.
pub trait Bucket: Copy + Ord + Serialize + 'static {
    /// Every bucket, in display order.
    const BUCKETS: &'static [Self];
}

impl Bucket for Season {
    const BUCKETS: &'static [Self] = &Season::ALL;
}

impl Bucket for Period {
    const BUCKETS: &'static [Self] = &Period::ALL;
}

/// `year -> bucket -> name -> milliseconds`.
///
/// A year appears once it receives its first play, with every bucket
/// present (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateTable<B: Bucket> {
    years: BTreeMap<i32, BTreeMap<B, Tally>>,
}

impl<B: Bucket> Default for AggregateTable<B> {
    fn default() -> Self {
        Self {
            years: BTreeMap::new(),
        }
    }
}

impl<B: Bucket> AggregateTable<B> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ms` to `name` in the `year` × `bucket` cell.
    pub fn add(&mut self, year: i32, bucket: B, name: &str, ms: u64) {
        self.years
            .entry(year)
            .or_insert_with(|| B::BUCKETS.iter().map(|b| (*b, Tally::new())).collect())
            .entry(bucket)
            .or_default()
            .add(name, ms);
    }

    /// Milliseconds for `name` in one cell, zero when absent.
    pub fn get(&self, year: i32, bucket: B, name: &str) -> u64 {
        self.cell(year, bucket).and_then(|t| t.get(name)).unwrap_or(0)
    }

    /// One cell.
    pub fn cell(&self, year: i32, bucket: B) -> Option<&Tally> {
        self.years.get(&year).and_then(|buckets| buckets.get(&bucket))
    }

    /// Buckets of one year.
    pub fn year(&self, year: i32) -> Option<&BTreeMap<B, Tally>> {
        self.years.get(&year)
    }

    /// Years in ascending order with their buckets.
    pub fn years(&self) -> impl Iterator<Item = (i32, &BTreeMap<B, Tally>)> {
        self.years.iter().map(|(year, buckets)| (*year, buckets))
    }

    /// Whether no play was recorded.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Top `n` names of every cell, years ascending, buckets in display order.
    pub fn rankings(&self, n: usize) -> Vec<CellRanking<B>> {
        self.years()
            .flat_map(|(year, buckets)| {
                buckets.iter().map(move |(bucket, tally)| CellRanking {
                    year,
                    bucket: *bucket,
                    entries: tally.top(n),
                })
            })
            .collect()
    }
}

/// The ranked names of one `year` × `bucket` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellRanking<B> {
    /// Calendar year.
    pub year: i32,
    /// Season or period.
    pub bucket: B,
    /// Ranked names; empty when the cell had no plays.
    pub entries: Vec<RankedEntry>,
}

/// A name's playback laid out over a [`YearWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSeries {
    /// Artist or track key.
    pub name: String,
    /// Playback across all years, inside the window or not.
    pub total_ms: u64,
    /// Playback per window year.
    pub yearly_ms: Vec<u64>,
}

impl YearSeries {
    /// Sum of the window slots, saturating at `u64::MAX`.
    pub fn window_total(&self) -> u64 {
        self.yearly_ms.iter().fold(0, |sum, ms| sum.saturating_add(*ms))
    }
}

/// Insertion-ordered collection of [`YearSeries`].
#[derive(Debug, Clone)]
pub(crate) struct SeriesBook {
    window: YearWindow,
    series: IndexMap<String, YearSeries>,
}

impl SeriesBook {
    pub(crate) fn new(window: YearWindow) -> Self {
        Self {
            window,
            series: IndexMap::new(),
        }
    }

    pub(crate) fn add(&mut self, name: &str, year: i32, ms: u64) {
        let window = self.window;
        let series = self
            .series
            .entry(name.to_string())
            .or_insert_with(|| YearSeries {
                name: name.to_string(),
                total_ms: 0,
                yearly_ms: window.empty_series(),
            });

        series.total_ms = series.total_ms.saturating_add(ms);
        if let Some(i) = window.index_of(year) {
            series.yearly_ms[i] = series.yearly_ms[i].saturating_add(ms);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.series.len()
    }

    pub(crate) fn top<F>(self, n: usize, key: F) -> Vec<YearSeries>
    where
        F: Fn(&YearSeries) -> u64,
    {
        rank_by(self.series.into_values().collect(), n, key)
    }
}

/// Buckets an event's timestamp, `None` when it is missing or unreadable.
pub(crate) fn classify_event(event: &PlayEvent, classifier: &dyn TemporalClassifier) -> Option<TemporalKey> {
    let timestamp = event.timestamp.as_deref()?;
    match classifier.classify(timestamp) {
        Ok(key) => Some(key),
        Err(err) => {
            trace!("Dropping play: {err}");
            None
        }
    }
}
