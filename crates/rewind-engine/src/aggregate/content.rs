//! Music versus podcast playback per year.

use super::{classify_event, ViewAggregator};
use crate::temporal::TemporalClassifier;
use rewind_common::{ContentType, PlayEvent};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Playback split by content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentSplit {
    /// Music playback.
    pub music_ms: u64,
    /// Podcast playback.
    pub podcast_ms: u64,
}

impl ContentSplit {
    /// Adds `ms` to the bucket of `content`.
    pub fn add(&mut self, content: ContentType, ms: u64) {
        let bucket = match content {
            ContentType::Music => &mut self.music_ms,
            ContentType::Podcast => &mut self.podcast_ms,
        };
        *bucket = bucket.saturating_add(ms);
    }

    /// Playback of one content type.
    pub const fn get(&self, content: ContentType) -> u64 {
        match content {
            ContentType::Music => self.music_ms,
            ContentType::Podcast => self.podcast_ms,
        }
    }

    /// Music plus podcasts.
    pub const fn total(&self) -> u64 {
        self.music_ms.saturating_add(self.podcast_ms)
    }
}

/// Content split per calendar year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentTrends {
    /// `year -> split`, years ascending.
    pub years: BTreeMap<i32, ContentSplit>,
    /// Plays dropped for an unreadable timestamp.
    pub skipped_events: usize,
}

impl ContentTrends {
    /// Playback over every year, saturating at `u64::MAX`.
    pub fn total_ms(&self) -> u64 {
        self.years
            .values()
            .fold(0, |sum, split| sum.saturating_add(split.total()))
    }
}

/// Builds [`ContentTrends`]. Every play counts; a play is a podcast when it
/// names an episode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTrendsAggregator;

impl ContentTrendsAggregator {
    /// Creates the aggregator.
    pub const fn new() -> Self {
        Self
    }
}

impl ViewAggregator for ContentTrendsAggregator {
    type Output = ContentTrends;

    #[instrument(skip_all, fields(events = events.len()))]
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> ContentTrends {
        let trends = events.iter().fold(ContentTrends::default(), |mut acc, event| {
            match classify_event(event, classifier) {
                Some(key) => acc
                    .years
                    .entry(key.year)
                    .or_default()
                    .add(event.content_type(), event.ms_played),
                None => acc.skipped_events += 1,
            }
            acc
        });

        debug!(
            years = trends.years.len(),
            skipped = trends.skipped_events,
            "Built content trends"
        );
        trends
    }

    fn name(&self) -> &'static str {
        "contentTrends"
    }
}
