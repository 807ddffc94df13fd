//! View selection and dispatch.

use crate::aggregate::{
    ContentTrends, ContentTrendsAggregator, ListeningSummary, SeasonalArtistTrends,
    SeasonalTrendsAggregator, SummaryAggregator, TimeOfDayAggregator, TimeOfDayDistribution,
    TrackPopularity, TrackPopularityAggregator, ViewAggregator,
};
use crate::present::{render, RenderedView};
use crate::temporal::{CalendarClassifier, TemporalClassifier};
use rewind_common::{PlayEvent, Result};
use rewind_config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument};

/// The five analytical views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Artist playback per year and season.
    MonthlyTrends,
    /// Track playback per year and season.
    PopularityOverTime,
    /// Music versus podcasts per year.
    ContentTrends,
    /// Playback per period of the day.
    TimeOfDay,
    /// All-time totals and top lists.
    Summary,
}

impl ViewMode {
    /// Every view, in menu order.
    pub const ALL: [Self; 5] = [
        Self::MonthlyTrends,
        Self::PopularityOverTime,
        Self::ContentTrends,
        Self::TimeOfDay,
        Self::Summary,
    ];

    /// The selector string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MonthlyTrends => "monthlyTrends",
            Self::PopularityOverTime => "popularityOverTime",
            Self::ContentTrends => "contentTrends",
            Self::TimeOfDay => "timeOfDay",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selector that names no view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{selector}', expected one of: {}", valid_selectors())]
pub struct UnknownViewMode {
    /// The rejected selector.
    pub selector: String,
}

/// Comma-separated list of the accepted selectors.
pub fn valid_selectors() -> String {
    ViewMode::ALL
        .iter()
        .map(|mode| mode.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    /// Accepts the camelCase selector, or the same words in kebab or snake
    /// case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| UnknownViewMode {
                selector: s.to_string(),
            })
    }
}

/// The aggregate of one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AggregateResult {
    /// See [`SeasonalArtistTrends`].
    MonthlyTrends(SeasonalArtistTrends),
    /// See [`TrackPopularity`].
    PopularityOverTime(TrackPopularity),
    /// See [`ContentTrends`].
    ContentTrends(ContentTrends),
    /// See [`TimeOfDayDistribution`].
    TimeOfDay(TimeOfDayDistribution),
    /// See [`ListeningSummary`].
    Summary(ListeningSummary),
}

impl AggregateResult {
    /// The view this aggregate belongs to.
    pub const fn mode(&self) -> ViewMode {
        match self {
            Self::MonthlyTrends(_) => ViewMode::MonthlyTrends,
            Self::PopularityOverTime(_) => ViewMode::PopularityOverTime,
            Self::ContentTrends(_) => ViewMode::ContentTrends,
            Self::TimeOfDay(_) => ViewMode::TimeOfDay,
            Self::Summary(_) => ViewMode::Summary,
        }
    }

    /// Plays the view dropped for an unreadable timestamp.
    pub const fn skipped_events(&self) -> usize {
        match self {
            Self::MonthlyTrends(r) => r.skipped_events,
            Self::PopularityOverTime(r) => r.skipped_events,
            Self::ContentTrends(r) => r.skipped_events,
            Self::TimeOfDay(r) => r.skipped_events,
            Self::Summary(r) => r.skipped_events,
        }
    }
}

/// Computes one view. Pure: the same inputs always give the same result.
pub fn compute_view(
    mode: ViewMode,
    events: &[PlayEvent],
    classifier: &dyn TemporalClassifier,
    config: &AnalysisConfig,
) -> AggregateResult {
    match mode {
        ViewMode::MonthlyTrends => AggregateResult::MonthlyTrends(
            SeasonalTrendsAggregator::from_config(config).aggregate(events, classifier),
        ),
        ViewMode::PopularityOverTime => AggregateResult::PopularityOverTime(
            TrackPopularityAggregator::from_config(config).aggregate(events, classifier),
        ),
        ViewMode::ContentTrends => {
            AggregateResult::ContentTrends(ContentTrendsAggregator::new().aggregate(events, classifier))
        }
        ViewMode::TimeOfDay => AggregateResult::TimeOfDay(
            TimeOfDayAggregator::from_config(config).aggregate(events, classifier),
        ),
        ViewMode::Summary => {
            AggregateResult::Summary(SummaryAggregator::from_config(config).aggregate(events, classifier))
        }
    }
}

/// A computed view with its presentation.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    /// The view.
    pub mode: ViewMode,
    /// Engine output.
    pub aggregate: AggregateResult,
    /// Chart and list rendering of `aggregate`.
    pub presentation: RenderedView,
}

/// Analysis settings bound to their classifier.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    classifier: CalendarClassifier,
}

impl Analyzer {
    /// Builds an analyzer, resolving the configured timezone.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let classifier = CalendarClassifier::from_config(&config)?;
        Ok(Self { config, classifier })
    }

    /// The analysis settings.
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Computes one view.
    pub fn compute(&self, mode: ViewMode, events: &[PlayEvent]) -> AggregateResult {
        compute_view(mode, events, &self.classifier, &self.config)
    }

    /// Computes and renders one view.
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn report(&self, mode: ViewMode, events: &[PlayEvent]) -> ViewReport {
        let aggregate = self.compute(mode, events);
        let presentation = render(&aggregate);
        info!(
            skipped = aggregate.skipped_events(),
            charts = presentation.charts.len(),
            sections = presentation.sections.len(),
            "Computed view"
        );
        ViewReport {
            mode,
            aggregate,
            presentation,
        }
    }
}
