//! Property tests for the aggregate builders.

use proptest::prelude::*;
use rewind_common::test_utils::property_testing::history_strategy;
use rewind_common::PlayEvent;
use rewind_config::AnalysisConfig;
use rewind_engine::{
    top_n, Analyzer, AggregateResult, CalendarClassifier, ContentTrendsAggregator,
    SummaryAggregator, TemporalClassifier, Tally, ViewAggregator, ViewMode,
};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::default()).unwrap()
}

fn valid_ms(events: &[PlayEvent]) -> u64 {
    let classifier = CalendarClassifier::new();
    events
        .iter()
        .filter(|e| {
            e.timestamp
                .as_deref()
                .is_some_and(|ts| classifier.classify(ts).is_ok())
        })
        .map(|e| e.ms_played)
        .sum()
}

proptest! {
    #[test]
    fn prop_every_view_is_idempotent(events in history_strategy(60)) {
        let analyzer = analyzer();
        for mode in ViewMode::ALL {
            prop_assert_eq!(analyzer.compute(mode, &events), analyzer.compute(mode, &events));
        }
    }

    #[test]
    fn prop_totals_ignore_order(events in history_strategy(60)) {
        let mut reversed = events.clone();
        reversed.reverse();
        let classifier = CalendarClassifier::new();
        let summary = SummaryAggregator::default();

        let forward = summary.aggregate(&events, &classifier);
        let backward = summary.aggregate(&reversed, &classifier);
        prop_assert_eq!(forward.total_ms, backward.total_ms);
        prop_assert_eq!(&forward.by_year, &backward.by_year);
        prop_assert_eq!(&forward.time_of_day, &backward.time_of_day);

        let content = ContentTrendsAggregator::new();
        prop_assert_eq!(
            content.aggregate(&events, &classifier).years,
            content.aggregate(&reversed, &classifier).years
        );

        let analyzer = analyzer();
        let (AggregateResult::TimeOfDay(a), AggregateResult::TimeOfDay(b)) = (
            analyzer.compute(ViewMode::TimeOfDay, &events),
            analyzer.compute(ViewMode::TimeOfDay, &reversed),
        ) else {
            unreachable!();
        };
        prop_assert_eq!(a.overall, b.overall);
        prop_assert_eq!(a.yearly, b.yearly);
    }

    #[test]
    fn prop_content_conserves_playback(events in history_strategy(80)) {
        let trends = ContentTrendsAggregator::new().aggregate(&events, &CalendarClassifier::new());
        prop_assert_eq!(trends.total_ms(), valid_ms(&events));

        let skipped = events.len() - events
            .iter()
            .filter(|e| e.timestamp.as_deref().is_some_and(|ts| CalendarClassifier::new().classify(ts).is_ok()))
            .count();
        prop_assert_eq!(trends.skipped_events, skipped);
    }

    #[test]
    fn prop_summary_matches_content_total(events in history_strategy(80)) {
        let analyzer = analyzer();
        let (AggregateResult::Summary(summary), AggregateResult::ContentTrends(content)) = (
            analyzer.compute(ViewMode::Summary, &events),
            analyzer.compute(ViewMode::ContentTrends, &events),
        ) else {
            unreachable!();
        };
        prop_assert_eq!(summary.total_ms, content.total_ms());
    }

    #[test]
    fn prop_top_n_bound(
        entries in prop::collection::vec(("[a-f]{1,2}", 0u64..1_000), 0..40),
        n in 0usize..12,
    ) {
        let tally: Tally = entries.iter().map(|(name, ms)| (name.as_str(), *ms)).collect();
        let top = top_n(tally.iter(), n);

        prop_assert_eq!(top.len(), n.min(tally.len()));
        prop_assert!(top.windows(2).all(|w| w[0].ms_played >= w[1].ms_played));

        let mut names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), top.len());

        if let Some(last) = top.last() {
            for (name, ms) in tally.iter() {
                if ms > last.ms_played {
                    prop_assert!(top.iter().any(|e| e.name == name));
                }
            }
        }
    }

    #[test]
    fn prop_time_of_day_never_counts_excluded(events in history_strategy(60)) {
        let AggregateResult::TimeOfDay(tod) = analyzer().compute(ViewMode::TimeOfDay, &events) else {
            unreachable!();
        };
        let excluded = events
            .iter()
            .filter(|e| e.artist_name.as_deref() == Some("The Weeknd"))
            .count();
        prop_assert_eq!(tod.excluded_events, excluded);
        prop_assert!(tod.leaders.iter().all(|l| l.artist != "The Weeknd"));
    }
}
