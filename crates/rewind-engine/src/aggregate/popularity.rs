//! Track popularity over time.

use super::{classify_event, AggregateTable, CellRanking, SeriesBook, ViewAggregator, YearSeries, YearWindow};
use crate::temporal::{Season, TemporalClassifier};
use rewind_common::PlayEvent;
use rewind_config::AnalysisConfig;
use serde::Serialize;
use tracing::{debug, instrument};

/// Track playback per year and season, keyed `"<track> by <artist>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackPopularity {
    /// Years the series are laid out over.
    pub window: YearWindow,
    /// `year -> season -> track key -> ms`.
    pub table: AggregateTable<Season>,
    /// Most played tracks by their summed window series.
    pub top_tracks: Vec<YearSeries>,
    /// Most played tracks of every year and season.
    pub cell_rankings: Vec<CellRanking<Season>>,
    /// Plays dropped for an unreadable timestamp.
    pub skipped_events: usize,
}

/// Builds [`TrackPopularity`]. Plays need both a track and an artist.
#[derive(Debug, Clone)]
pub struct TrackPopularityAggregator {
    window: YearWindow,
    chart_tracks: usize,
    cell_tracks: usize,
}

impl TrackPopularityAggregator {
    /// Creates an aggregator with explicit limits.
    pub const fn new(window: YearWindow, chart_tracks: usize, cell_tracks: usize) -> Self {
        Self {
            window,
            chart_tracks,
            cell_tracks,
        }
    }

    /// Creates an aggregator from the analysis settings.
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            YearWindow::from_config(config),
            config.limits.popularity_chart_tracks,
            config.limits.popularity_cell_tracks,
        )
    }
}

impl Default for TrackPopularityAggregator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

struct PopularityFold {
    table: AggregateTable<Season>,
    series: SeriesBook,
    skipped: usize,
}

impl ViewAggregator for TrackPopularityAggregator {
    type Output = TrackPopularity;

    #[instrument(skip_all, fields(events = events.len()))]
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> TrackPopularity {
        let initial = PopularityFold {
            table: AggregateTable::new(),
            series: SeriesBook::new(self.window),
            skipped: 0,
        };

        let fold = events.iter().fold(initial, |mut acc, event| {
            let Some(track) = event.track_with_artist() else {
                return acc;
            };
            match classify_event(event, classifier) {
                Some(key) => {
                    acc.table.add(key.year, key.season, &track, event.ms_played);
                    acc.series.add(&track, key.year, event.ms_played);
                }
                None => acc.skipped += 1,
            }
            acc
        });

        let track_count = fold.series.len();
        let cell_rankings = fold.table.rankings(self.cell_tracks);
        let top_tracks = fold.series.top(self.chart_tracks, YearSeries::window_total);

        debug!(
            tracks = track_count,
            skipped = fold.skipped,
            "Built track popularity"
        );

        TrackPopularity {
            window: self.window,
            table: fold.table,
            top_tracks,
            cell_rankings,
            skipped_events: fold.skipped,
        }
    }

    fn name(&self) -> &'static str {
        "popularityOverTime"
    }
}
