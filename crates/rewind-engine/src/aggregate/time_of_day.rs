//! Listening time by time of day.

use super::{classify_event, AggregateTable, ViewAggregator, YearWindow};
use crate::temporal::{Period, TemporalClassifier};
use rewind_common::PlayEvent;
use rewind_config::AnalysisConfig;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Playback per period, every period present.
pub type PeriodTotals = BTreeMap<Period, u64>;

/// A zeroed [`PeriodTotals`].
pub fn zeroed_periods() -> PeriodTotals {
    Period::ALL.iter().map(|period| (*period, 0)).collect()
}

/// Time-of-day distribution of playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOfDayDistribution {
    /// Years the yearly breakdown covers.
    pub window: YearWindow,
    /// Playback per period over every year.
    pub overall: PeriodTotals,
    /// Playback per period for each window year, zero-filled.
    pub yearly: BTreeMap<i32, PeriodTotals>,
    /// `year -> period -> artist -> ms` for window years.
    pub artist_popularity: AggregateTable<Period>,
    /// Most played artist of every window year and period that had one.
    pub leaders: Vec<PeriodLeader>,
    /// Plays left out because their artist is excluded.
    pub excluded_events: usize,
    /// Plays dropped for an unreadable timestamp.
    pub skipped_events: usize,
}

/// Most played artist of one year and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodLeader {
    /// Calendar year.
    pub year: i32,
    /// Period of the day.
    pub period: Period,
    /// Artist name.
    pub artist: String,
    /// The artist's playback in that period.
    pub ms_played: u64,
    /// All playback in that year and period.
    pub period_total_ms: u64,
}

/// Builds [`TimeOfDayDistribution`].
///
/// Plays by an excluded artist are left out of every total. Plays without
/// an artist count toward the totals but never lead a period.
#[derive(Debug, Clone)]
pub struct TimeOfDayAggregator {
    window: YearWindow,
    excluded_artists: HashSet<String>,
}

impl TimeOfDayAggregator {
    /// Creates an aggregator excluding `excluded_artists`.
    pub fn new<I, S>(window: YearWindow, excluded_artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            window,
            excluded_artists: excluded_artists.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an aggregator from the analysis settings.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            YearWindow::from_config(config),
            config.excluded_time_of_day_artists.iter().cloned(),
        )
    }

    fn is_excluded(&self, event: &PlayEvent) -> bool {
        event
            .artist_name
            .as_deref()
            .is_some_and(|artist| self.excluded_artists.contains(artist))
    }
}

impl Default for TimeOfDayAggregator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ViewAggregator for TimeOfDayAggregator {
    type Output = TimeOfDayDistribution;

    #[instrument(skip_all, fields(events = events.len()))]
    fn aggregate(&self, events: &[PlayEvent], classifier: &dyn TemporalClassifier) -> TimeOfDayDistribution {
        let initial = TimeOfDayDistribution {
            window: self.window,
            overall: zeroed_periods(),
            yearly: self.window.years().map(|year| (year, zeroed_periods())).collect(),
            artist_popularity: AggregateTable::new(),
            leaders: Vec::new(),
            excluded_events: 0,
            skipped_events: 0,
        };

        let mut distribution = events.iter().fold(initial, |mut acc, event| {
            if self.is_excluded(event) {
                acc.excluded_events += 1;
                return acc;
            }
            let Some(key) = classify_event(event, classifier) else {
                acc.skipped_events += 1;
                return acc;
            };

            add_ms(&mut acc.overall, key.period, event.ms_played);
            if let Some(yearly) = acc.yearly.get_mut(&key.year) {
                add_ms(yearly, key.period, event.ms_played);
                if let Some(artist) = event.artist_name.as_deref() {
                    acc.artist_popularity
                        .add(key.year, key.period, artist, event.ms_played);
                }
            }
            acc
        });

        distribution.leaders = leaders(&distribution);

        debug!(
            leaders = distribution.leaders.len(),
            excluded = distribution.excluded_events,
            skipped = distribution.skipped_events,
            "Built time-of-day distribution"
        );
        distribution
    }

    fn name(&self) -> &'static str {
        "timeOfDay"
    }
}

fn add_ms(totals: &mut PeriodTotals, period: Period, ms: u64) {
    let slot = totals.entry(period).or_insert(0);
    *slot = slot.saturating_add(ms);
}

fn leaders(distribution: &TimeOfDayDistribution) -> Vec<PeriodLeader> {
    distribution
        .yearly
        .iter()
        .flat_map(|(&year, totals)| {
            Period::ALL.iter().filter_map(move |&period| {
                let top = distribution
                    .artist_popularity
                    .cell(year, period)?
                    .top(1)
                    .into_iter()
                    .next()
                    .filter(|entry| entry.ms_played > 0)?;
                Some(PeriodLeader {
                    year,
                    period,
                    artist: top.name,
                    ms_played: top.ms_played,
                    period_total_ms: totals.get(&period).copied().unwrap_or(0),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::CalendarClassifier;
    use rewind_common::test_utils::{event_fixtures::*, ts};

    fn distribution(events: &[PlayEvent]) -> TimeOfDayDistribution {
        TimeOfDayAggregator::default().aggregate(events, &CalendarClassifier::new())
    }

    #[test]
    fn test_years_are_preseeded() {
        let result = distribution(&[]);
        assert_eq!(result.yearly.len(), 11);
        assert!(result.yearly.values().all(|t| t.values().all(|ms| *ms == 0)));
        assert_eq!(result.overall.len(), 4);
        assert!(result.leaders.is_empty());
    }

    #[test]
    fn test_periods_and_leaders() {
        let result = distribution(&[
            artist_play(&ts(2020, 1, 1, 7), 100, "A"),
            artist_play(&ts(2020, 1, 2, 8), 300, "B"),
            artist_play(&ts(2020, 1, 3, 22), 50, "A"),
            PlayEvent::new(ts(2020, 1, 4, 9), 1_000),
        ]);

        assert_eq!(result.overall[&Period::Morning], 1_400);
        assert_eq!(result.overall[&Period::Evening], 50);
        assert_eq!(result.yearly[&2020][&Period::Morning], 1_400);

        let morning = result
            .leaders
            .iter()
            .find(|l| l.period == Period::Morning)
            .unwrap();
        assert_eq!(morning.artist, "B");
        assert_eq!(morning.ms_played, 300);
        assert_eq!(morning.period_total_ms, 1_400);
        assert_eq!(result.leaders.len(), 2);
    }

    #[test]
    fn test_leaders_are_per_year() {
        let result = distribution(&[
            artist_play(&ts(2019, 6, 1, 14), 5_000, "A"),
            artist_play(&ts(2020, 6, 1, 14), 10, "B"),
        ]);

        let afternoon: Vec<_> = result
            .leaders
            .iter()
            .filter(|l| l.period == Period::Afternoon)
            .map(|l| (l.year, l.artist.as_str()))
            .collect();
        assert_eq!(afternoon, vec![(2019, "A"), (2020, "B")]);
    }

    #[test]
    fn test_exclusion_set() {
        let events = vec![
            artist_play(&ts(2020, 1, 1, 20), 9_000, "The Weeknd"),
            artist_play(&ts(2020, 1, 1, 20), 10, "A"),
        ];

        let result = distribution(&events);
        assert_eq!(result.excluded_events, 1);
        assert_eq!(result.overall[&Period::Evening], 10);
        assert_eq!(result.leaders[0].artist, "A");

        let unfiltered = TimeOfDayAggregator::new(YearWindow::default(), Vec::<String>::new())
            .aggregate(&events, &CalendarClassifier::new());
        assert_eq!(unfiltered.excluded_events, 0);
        assert_eq!(unfiltered.leaders[0].artist, "The Weeknd");
    }

    #[test]
    fn test_out_of_window_only_in_overall() {
        let result = distribution(&[artist_play(&ts(2030, 1, 1, 3), 77, "A")]);
        assert_eq!(result.overall[&Period::Night], 77);
        assert!(!result.yearly.contains_key(&2030));
        assert!(result.artist_popularity.is_empty());
    }

    #[test]
    fn test_zero_duration_never_leads() {
        let result = distribution(&[artist_play(&ts(2020, 1, 1, 3), 0, "A")]);
        assert!(result.leaders.is_empty());
    }
}
