//! Chart and list rendering of aggregates.
//!
//! Rendering only reads an [`AggregateResult`]; every number shown comes
//! from the engine's output, converted to hours or `"Xh Ym"`.

use crate::aggregate::{
    CellRanking, ContentTrends, ListeningSummary, PeriodTotals, SeasonalArtistTrends,
    TimeOfDayDistribution, TrackPopularity, YearSeries, YearWindow,
};
use crate::ranking::RankedEntry;
use crate::temporal::Period;
use crate::view::{AggregateResult, ViewMode};
use rewind_common::{format_duration, format_hours, ms_to_hours, ContentType};
use serde::Serialize;
use std::fmt::Display;

/// Placeholder item of an empty list section.
pub const EMPTY_SECTION: &str = "No data for this section.";

/// Chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Line chart over labelled x values.
    Line,
    /// Grouped bar chart over labelled x values.
    Bar,
    /// Bubble chart of free points.
    Bubble,
}

/// One bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    /// Year.
    pub x: f64,
    /// Hours.
    pub y: f64,
    /// Radius.
    pub r: f64,
    /// Artist shown in the tooltip.
    pub label: String,
}

/// Data of a series: one value per x label, or bubbles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// Hours aligned with the chart's labels.
    Values(Vec<f64>),
    /// Free points.
    Bubbles(Vec<BubblePoint>),
}

/// A named series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Legend label.
    pub label: String,
    /// The points.
    pub data: SeriesData,
}

/// A chart ready for a plotting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Chart type.
    pub kind: ChartKind,
    /// Title.
    pub title: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// X labels; empty for bubble charts.
    pub labels: Vec<String>,
    /// Series.
    pub datasets: Vec<Dataset>,
}

/// One line of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    /// Artist, track, album, period or year.
    pub label: String,
    /// Formatted playback; empty for placeholders.
    pub value: String,
}

impl ListItem {
    fn new(label: impl Display, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }

    fn placeholder() -> Self {
        Self::new(EMPTY_SECTION, String::new())
    }
}

/// A collapsible list section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSection {
    /// Header.
    pub title: String,
    /// Lines directly under the header.
    pub items: Vec<ListItem>,
    /// Nested sections.
    pub children: Vec<ListSection>,
}

impl ListSection {
    fn leaf(title: impl Display, items: Vec<ListItem>) -> Self {
        Self {
            title: title.to_string(),
            items: if items.is_empty() { vec![ListItem::placeholder()] } else { items },
            children: Vec::new(),
        }
    }

    fn group(title: impl Display, children: Vec<Self>) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
            children,
        }
    }
}

/// Everything a client needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    /// The view.
    pub mode: ViewMode,
    /// Banner line, when the view has one.
    pub headline: Option<String>,
    /// Charts.
    pub charts: Vec<Chart>,
    /// Lists.
    pub sections: Vec<ListSection>,
}

/// Renders an aggregate.
pub fn render(result: &AggregateResult) -> RenderedView {
    match result {
        AggregateResult::MonthlyTrends(trends) => render_seasonal(trends),
        AggregateResult::PopularityOverTime(popularity) => render_popularity(popularity),
        AggregateResult::ContentTrends(content) => render_content(content),
        AggregateResult::TimeOfDay(distribution) => render_time_of_day(distribution),
        AggregateResult::Summary(summary) => render_summary(summary),
    }
}

fn ranked_items(entries: &[RankedEntry]) -> Vec<ListItem> {
    entries
        .iter()
        .map(|entry| ListItem::new(&entry.name, format_duration(entry.ms_played)))
        .collect()
}

fn hours_items(entries: &[RankedEntry]) -> Vec<ListItem> {
    entries
        .iter()
        .map(|entry| ListItem::new(&entry.name, format!("{} hours", format_hours(entry.ms_played))))
        .collect()
}

fn year_labels(window: YearWindow) -> Vec<String> {
    window.years().map(|year| year.to_string()).collect()
}

fn series_datasets(series: &[YearSeries]) -> Vec<Dataset> {
    series
        .iter()
        .map(|s| Dataset {
            label: s.name.clone(),
            data: SeriesData::Values(s.yearly_ms.iter().copied().map(ms_to_hours).collect()),
        })
        .collect()
}

fn cell_sections<B: Display + Copy>(title: &str, cells: &[CellRanking<B>]) -> ListSection {
    let mut years: Vec<ListSection> = Vec::new();
    for cell in cells {
        let bucket = ListSection::leaf(cell.bucket, ranked_items(&cell.entries));
        match years.last_mut() {
            Some(year) if year.title == cell.year.to_string() => year.children.push(bucket),
            _ => years.push(ListSection::group(cell.year, vec![bucket])),
        }
    }
    ListSection::group(title, years)
}

#[allow(clippy::cast_precision_loss)]
fn seasonal_radius(ms: u64) -> f64 {
    (ms as f64).sqrt() / 200.0 * 0.5
}

fn period_radius(hours: f64) -> f64 {
    hours.sqrt() * 3.0
}

fn render_seasonal(trends: &SeasonalArtistTrends) -> RenderedView {
    let line = Chart {
        kind: ChartKind::Line,
        title: "Top Artists Per Year".to_string(),
        x_title: "Year".to_string(),
        y_title: "Listening Time (hours)".to_string(),
        labels: year_labels(trends.window),
        datasets: series_datasets(&trends.top_artists),
    };

    let mut seasons: Vec<Dataset> = Vec::new();
    for leader in &trends.seasonal_leaders {
        let point = BubblePoint {
            x: f64::from(leader.year),
            y: ms_to_hours(leader.ms_played),
            r: seasonal_radius(leader.ms_played),
            label: leader.artist.clone(),
        };
        push_bubble(&mut seasons, leader.season.label(), point);
    }
    let bubble = Chart {
        kind: ChartKind::Bubble,
        title: "Top Artist of Each Season".to_string(),
        x_title: "Year".to_string(),
        y_title: "Listening Time (hours)".to_string(),
        labels: Vec::new(),
        datasets: seasons,
    };

    RenderedView {
        mode: ViewMode::MonthlyTrends,
        headline: None,
        charts: vec![line, bubble],
        sections: vec![cell_sections("Top Artists by Season", &trends.cell_rankings)],
    }
}

fn push_bubble(datasets: &mut Vec<Dataset>, label: &str, point: BubblePoint) {
    if let Some(Dataset {
        data: SeriesData::Bubbles(points),
        ..
    }) = datasets.iter_mut().find(|d| d.label == label)
    {
        points.push(point);
    } else {
        datasets.push(Dataset {
            label: label.to_string(),
            data: SeriesData::Bubbles(vec![point]),
        });
    }
}

fn render_popularity(popularity: &TrackPopularity) -> RenderedView {
    let line = Chart {
        kind: ChartKind::Line,
        title: "Top Ten Tracks of All Time".to_string(),
        x_title: "Year".to_string(),
        y_title: "Listening Time (hours)".to_string(),
        labels: year_labels(popularity.window),
        datasets: series_datasets(&popularity.top_tracks),
    };

    RenderedView {
        mode: ViewMode::PopularityOverTime,
        headline: None,
        charts: vec![line],
        sections: vec![cell_sections("Top Tracks by Season", &popularity.cell_rankings)],
    }
}

fn render_content(content: &ContentTrends) -> RenderedView {
    let labels = content.years.keys().map(ToString::to_string).collect();
    let datasets = ContentType::ALL
        .iter()
        .map(|kind| Dataset {
            label: kind.label().to_string(),
            data: SeriesData::Values(content.years.values().map(|split| ms_to_hours(split.get(*kind))).collect()),
        })
        .collect();
    let bar = Chart {
        kind: ChartKind::Bar,
        title: "Music vs Podcasts by Year".to_string(),
        x_title: "Year".to_string(),
        y_title: "Listening Time (hours)".to_string(),
        labels,
        datasets,
    };

    let years = content
        .years
        .iter()
        .map(|(year, split)| {
            let items = ContentType::ALL
                .iter()
                .map(|kind| ListItem::new(kind, format_duration(split.get(*kind))))
                .collect();
            ListSection::leaf(year, items)
        })
        .collect();

    RenderedView {
        mode: ViewMode::ContentTrends,
        headline: None,
        charts: vec![bar],
        sections: vec![ListSection::group("Music vs Podcasts", years)],
    }
}

fn period_items(totals: &PeriodTotals) -> Vec<ListItem> {
    totals
        .iter()
        .map(|(period, ms)| ListItem::new(period, format_duration(*ms)))
        .collect()
}

fn render_time_of_day(distribution: &TimeOfDayDistribution) -> RenderedView {
    let mut periods: Vec<Dataset> = Vec::new();
    for leader in &distribution.leaders {
        let hours = ms_to_hours(leader.period_total_ms);
        let point = BubblePoint {
            x: f64::from(leader.year),
            y: hours,
            r: period_radius(hours),
            label: leader.artist.clone(),
        };
        push_bubble(&mut periods, leader.period.label(), point);
    }
    // Legend in period order, not order of first appearance.
    periods.sort_by_key(|d| Period::ALL.iter().position(|p| p.label() == d.label));

    let bubble = Chart {
        kind: ChartKind::Bubble,
        title: "Artist Popularity by Time of Day".to_string(),
        x_title: "Year".to_string(),
        y_title: "Listening Time (hours)".to_string(),
        labels: Vec::new(),
        datasets: periods,
    };

    let overall = ListSection::leaf("Overall Listening Time", period_items(&distribution.overall));
    let yearly = distribution
        .yearly
        .iter()
        .map(|(year, totals)| ListSection::leaf(format!("Year {year}"), period_items(totals)))
        .collect();

    RenderedView {
        mode: ViewMode::TimeOfDay,
        headline: None,
        charts: vec![bubble],
        sections: vec![overall, ListSection::group("Listening Time by Year", yearly)],
    }
}

fn render_summary(summary: &ListeningSummary) -> RenderedView {
    let bar = Chart {
        kind: ChartKind::Bar,
        title: "Total Listening Hours Over Years".to_string(),
        x_title: "Years".to_string(),
        y_title: "Listening Hours".to_string(),
        labels: summary.by_year.keys().map(ToString::to_string).collect(),
        datasets: vec![Dataset {
            label: "Listening Hours".to_string(),
            data: SeriesData::Values(summary.by_year.values().copied().map(ms_to_hours).collect()),
        }],
    };

    let by_year = summary
        .by_year
        .iter()
        .map(|(year, ms)| ListItem::new(year, format!("{} hours", format_hours(*ms))))
        .collect();
    let time_of_day = summary
        .time_of_day
        .iter()
        .map(|(period, ms)| ListItem::new(period, format!("{} hours", format_hours(*ms))))
        .collect();

    RenderedView {
        mode: ViewMode::Summary,
        headline: Some(format!("Total Listening Hours: {} hours", format_hours(summary.total_ms))),
        charts: vec![bar],
        sections: vec![
            ListSection::leaf("Listening Hours by Year", by_year),
            ListSection::leaf(
                format!("Top {} Artists of All-Time", summary.top_artists.len()),
                hours_items(&summary.top_artists),
            ),
            ListSection::leaf(
                format!("Top {} Tracks of All-Time", summary.top_tracks.len()),
                hours_items(&summary.top_tracks),
            ),
            ListSection::leaf(
                format!("Top {} Favorite Albums", summary.top_albums.len()),
                hours_items(&summary.top_albums),
            ),
            ListSection::leaf("Favorite Time to Listen to Music", time_of_day),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Analyzer;
    use rewind_common::test_utils::{event_fixtures::*, ts};
    use rewind_config::AnalysisConfig;

    fn rendered(mode: ViewMode, events: &[rewind_common::PlayEvent]) -> RenderedView {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        render(&analyzer.compute(mode, events))
    }

    #[test]
    fn test_seasonal_sections_and_placeholder() {
        let view = rendered(
            ViewMode::MonthlyTrends,
            &[artist_play(&ts(2020, 1, 15, 10), 3_900_000, "A")],
        );

        assert_eq!(view.mode, ViewMode::MonthlyTrends);
        let root = &view.sections[0];
        let year = &root.children[0];
        assert_eq!(year.title, "2020");
        assert_eq!(year.children.len(), 4);
        assert_eq!(year.children[0].title, "Winter");
        assert_eq!(year.children[0].items[0], ListItem::new("A", "1h 5m"));
        assert_eq!(year.children[1].items, vec![ListItem::placeholder()]);
    }

    #[test]
    fn test_seasonal_charts() {
        let view = rendered(
            ViewMode::MonthlyTrends,
            &[artist_play(&ts(2020, 1, 15, 10), 3_600_000, "A")],
        );

        let line = &view.charts[0];
        assert_eq!(line.kind, ChartKind::Line);
        assert_eq!(line.labels.len(), 11);
        assert_eq!(line.labels[6], "2020");
        match &line.datasets[0].data {
            SeriesData::Values(values) => assert!((values[6] - 1.0).abs() < f64::EPSILON),
            SeriesData::Bubbles(_) => panic!("line chart carries values"),
        }

        let bubble = &view.charts[1];
        assert_eq!(bubble.datasets[0].label, "Winter");
        match &bubble.datasets[0].data {
            SeriesData::Bubbles(points) => {
                assert!((points[0].r - 3_600_000f64.sqrt() / 400.0).abs() < 1e-9);
                assert_eq!(points[0].label, "A");
            }
            SeriesData::Values(_) => panic!("bubble chart carries points"),
        }
    }

    #[test]
    fn test_popularity_title() {
        let view = rendered(ViewMode::PopularityOverTime, &[]);
        assert_eq!(view.charts[0].title, "Top Ten Tracks of All Time");
        assert!(view.sections[0].children.is_empty());
    }

    #[test]
    fn test_content_bar_chart() {
        let view = rendered(
            ViewMode::ContentTrends,
            &[
                podcast_play(&ts(2021, 1, 1, 1), 7_200_000, "Ep"),
                artist_play(&ts(2021, 1, 1, 1), 1_800_000, "A"),
            ],
        );
        let bar = &view.charts[0];
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(bar.labels, vec!["2021"]);
        assert_eq!(bar.datasets[1].label, "Podcast");
        assert_eq!(bar.datasets[1].data, SeriesData::Values(vec![2.0]));
        assert_eq!(view.sections[0].children[0].items[0], ListItem::new("Music", "0h 30m"));
    }

    #[test]
    fn test_time_of_day_bubbles() {
        let view = rendered(
            ViewMode::TimeOfDay,
            &[artist_play(&ts(2020, 1, 1, 20), 4 * 3_600_000, "A")],
        );
        let bubble = &view.charts[0];
        assert_eq!(bubble.datasets.len(), 1);
        assert_eq!(bubble.datasets[0].label, "Evening");
        match &bubble.datasets[0].data {
            SeriesData::Bubbles(points) => {
                assert!((points[0].y - 4.0).abs() < f64::EPSILON);
                assert!((points[0].r - 6.0).abs() < f64::EPSILON);
            }
            SeriesData::Values(_) => panic!("bubble chart carries points"),
        }
        assert_eq!(view.sections[1].children.len(), 11);
    }

    #[test]
    fn test_summary_headline() {
        let view = rendered(ViewMode::Summary, &sample_history());
        assert_eq!(view.headline.as_deref(), Some("Total Listening Hours: 0.66 hours"));
        assert_eq!(view.sections.len(), 5);
        assert_eq!(view.sections[1].items[0].label, "Choir");
    }
}
