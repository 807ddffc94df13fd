//! Seasonal artist trends.

use super::{classify_event, AggregateTable, CellRanking, SeriesBook, ViewAggregator, YearSeries, YearWindow};
use crate::temporal::{Season, TemporalClassifier};
use rewind_common::PlayEvent;
use rewind_config::AnalysisConfig;
use serde::Serialize;
use tracing::{debug, instrument};

/// Artist playback per year and season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalArtistTrends {
    /// Years the series are laid out over.
    pub window: YearWindow,
    /// `year -> season -> artist -> ms`.
    pub table: AggregateTable<Season>,
    /// Most played artists overall, with their yearly series.
    pub top_artists: Vec<YearSeries>,
    /// Most played artists of every year and season.
    pub cell_rankings: Vec<CellRanking<Season>>,
    /// The number one artist of every non-empty year and season.
    pub seasonal_leaders: Vec<SeasonalLeader>,
    /// Plays dropped for an unreadable timestamp.
    pub skipped_events: usize,
}

/// Number one artist of a year and season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalLeader {
    /// Calendar year.
    pub year: i32,
    /// Season.
    pub season: Season,
    /// Artist name.
    pub artist: String,
    /// The artist's playback in that season.
    pub ms_played: u64,
}

/// Builds [`SeasonalArtistTrends`]. Plays without an artist are ignored.
#[derive(Debug, Clone)]
pub struct SeasonalTrendsAggregator {
    window: YearWindow,
    chart_artists: usize,
    cell_artists: usize,
}

impl SeasonalTrendsAggregator {
    /// Creates an aggregator with explicit limits.
    pub const fn new(window: YearWindow, chart_artists: usize, cell_artists: usize) -> Self {
        Self {
            window,
            chart_artists,
            cell_artists,
        }
    }

    /// Creates an aggregator from the analysis settings.
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            YearWindow::from_config(config),
            config.limits.seasonal_chart_artists,
            config.limits.seasonal_cell_artists,
        )
    }
}

impl Default for SeasonalTrendsAggregator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

struct SeasonalFold {
    table: AggregateTable<Season>,
    series: SeriesBook,
    skipped: usize,
}

impl ViewAggregator for SeasonalTrendsAggregator {
    type Output = SeasonalArtistTrends;

    #[instrument(skip_all, fields(events = events.len()))]
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> SeasonalArtistTrends {
        let initial = SeasonalFold {
            table: AggregateTable::new(),
            series: SeriesBook::new(self.window),
            skipped: 0,
        };

        let fold = events.iter().fold(initial, |mut acc, event| {
            let Some(artist) = event.artist_name.as_deref() else {
                return acc;
            };
            match classify_event(event, classifier) {
                Some(key) => {
                    acc.table.add(key.year, key.season, artist, event.ms_played);
                    acc.series.add(artist, key.year, event.ms_played);
                }
                None => acc.skipped += 1,
            }
            acc
        });

        let artist_count = fold.series.len();
        let cell_rankings = fold.table.rankings(self.cell_artists);
        let seasonal_leaders = fold
            .table
            .rankings(1)
            .into_iter()
            .filter_map(|cell| {
                cell.entries.into_iter().next().map(|top| SeasonalLeader {
                    year: cell.year,
                    season: cell.bucket,
                    artist: top.name,
                    ms_played: top.ms_played,
                })
            })
            .collect::<Vec<_>>();
        let top_artists = fold.series.top(self.chart_artists, |s| s.total_ms);

        debug!(
            artists = artist_count,
            leaders = seasonal_leaders.len(),
            skipped = fold.skipped,
            "Built seasonal artist trends"
        );

        SeasonalArtistTrends {
            window: self.window,
            table: fold.table,
            top_artists,
            cell_rankings,
            seasonal_leaders,
            skipped_events: fold.skipped,
        }
    }

    fn name(&self) -> &'static str {
        "monthlyTrends"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::CalendarClassifier;
    use rewind_common::test_utils::{event_fixtures::*, ts};

    fn trends(events: &[PlayEvent]) -> SeasonalArtistTrends {
        SeasonalTrendsAggregator::default().aggregate(events, &CalendarClassifier::new())
    }

    #[test]
    fn test_table_and_series() {
        let result = trends(&[
            artist_play(&ts(2020, 1, 15, 10), 60_000, "A"),
            artist_play(&ts(2020, 1, 20, 10), 120_000, "A"),
            artist_play(&ts(2021, 6, 1, 20), 30_000, "B"),
        ]);

        assert_eq!(result.table.get(2020, Season::Winter, "A"), 180_000);
        assert_eq!(result.table.get(2021, Season::Summer, "B"), 30_000);
        assert_eq!(result.top_artists.len(), 2);
        assert_eq!(result.top_artists[0].name, "A");
        assert_eq!(result.top_artists[0].yearly_ms[6], 180_000);
        assert_eq!(result.top_artists[1].yearly_ms[7], 30_000);
        assert_eq!(result.skipped_events, 0);
    }

    #[test]
    fn test_out_of_window_year_counts_toward_total_only() {
        let result = trends(&[
            artist_play(&ts(2010, 7, 1, 12), 500, "Old"),
            artist_play(&ts(2016, 7, 1, 12), 100, "Old"),
        ]);

        let old = &result.top_artists[0];
        assert_eq!(old.total_ms, 600);
        assert_eq!(old.window_total(), 100);
        assert_eq!(result.table.get(2010, Season::Summer, "Old"), 500);
    }

    #[test]
    fn test_missing_artist_and_bad_timestamp() {
        let result = trends(&[
            PlayEvent::new(ts(2020, 1, 1, 1), 1_000),
            artist_play("yesterday", 1_000, "A"),
            PlayEvent::default().with_artist("A"),
        ]);

        assert!(result.table.is_empty());
        assert!(result.top_artists.is_empty());
        assert_eq!(result.skipped_events, 2);
    }

    #[test]
    fn test_cell_rankings_cover_every_season() {
        let result = trends(&[
            artist_play(&ts(2020, 4, 1, 9), 10, "A"),
            artist_play(&ts(2020, 4, 2, 9), 30, "B"),
        ]);

        assert_eq!(result.cell_rankings.len(), 4);
        let spring = result
            .cell_rankings
            .iter()
            .find(|c| c.bucket == Season::Spring)
            .unwrap();
        assert_eq!(spring.entries[0].name, "B");
        assert!(result
            .cell_rankings
            .iter()
            .filter(|c| c.bucket != Season::Spring)
            .all(|c| c.entries.is_empty()));

        assert_eq!(result.seasonal_leaders.len(), 1);
        assert_eq!(result.seasonal_leaders[0].artist, "B");
        assert_eq!(result.seasonal_leaders[0].ms_played, 30);
    }

    #[test]
    fn test_chart_limit() {
        let events: Vec<_> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .zip(1u64..)
            .map(|(artist, ms)| artist_play(&ts(2019, 9, 1, 9), ms, artist))
            .collect();
        let result = trends(&events);

        let names: Vec<_> = result.top_artists.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["G", "F", "E", "D", "C"]);
        assert_eq!(result.cell_rankings[3].entries.len(), 5);
    }
}
