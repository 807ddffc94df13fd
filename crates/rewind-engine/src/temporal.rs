//! Calendar bucketing of play timestamps.
//!
//! A timestamp maps to a [`TemporalKey`]: its calendar year, one of four
//! [`Season`]s and one of four time-of-day [`Period`]s. Builders receive a
//! [`TemporalClassifier`] so the bucketing rules can be swapped in tests.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use rewind_common::{Result, RewindError};
use rewind_config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed calendar buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    /// December, January and February.
    Winter,
    /// March through May.
    Spring,
    /// June through August.
    Summer,
    /// September through November.
    Fall,
}

impl Season {
    /// All seasons in display order.
    pub const ALL: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// Season of a zero-based month (0 = January).
    pub const fn from_month0(month0: u32) -> Self {
        match month0 {
            0 | 1 | 11 => Self::Winter,
            2..=4 => Self::Spring,
            5..=7 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clock-hour buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// 06:00 to 11:59.
    Morning,
    /// 12:00 to 17:59.
    Afternoon,
    /// 18:00 to 23:59.
    Evening,
    /// 00:00 to 05:59.
    Night,
}

impl Period {
    /// All periods in display order.
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Period of an hour of the day.
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar buckets of one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalKey {
    /// Calendar year.
    pub year: i32,
    /// Season of the month.
    pub season: Season,
    /// Period of the hour.
    pub period: Period,
}

impl TemporalKey {
    /// Buckets a wall-clock time.
    pub fn from_naive(local: &NaiveDateTime) -> Self {
        Self {
            year: local.year(),
            season: Season::from_month0(local.month0()),
            period: Period::from_hour(local.hour()),
        }
    }
}

/// Maps a raw timestamp to its calendar buckets.
pub trait TemporalClassifier {
    /// Classifies `timestamp`, failing with [`RewindError::InvalidTimestamp`]
    /// when it cannot be read.
    fn classify(&self, timestamp: &str) -> Result<TemporalKey>;
}

impl<F> TemporalClassifier for F
where
    F: Fn(&str) -> Result<TemporalKey>,
{
    fn classify(&self, timestamp: &str) -> Result<TemporalKey> {
        self(timestamp)
    }
}

/// The default classifier.
///
/// Timestamps carrying an offset are bucketed by the wall clock of that
/// offset, or of `timezone` when one is set. Timestamps without an offset are
/// bucketed as written. Epoch milliseconds are UTC instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarClassifier {
    timezone: Option<Tz>,
}

impl CalendarClassifier {
    /// A classifier that never shifts timestamps.
    pub const fn new() -> Self {
        Self { timezone: None }
    }

    /// A classifier that converts instants into `timezone` before bucketing.
    pub const fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone: Some(timezone),
        }
    }

    /// Builds the classifier described by the analysis settings.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        match config.timezone.as_deref() {
            None => Ok(Self::new()),
            Some(zone) => zone
                .parse::<Tz>()
                .map(Self::with_timezone)
                .map_err(|_| RewindError::validation_field(format!("unknown timezone '{zone}'"), "analysis.timezone")),
        }
    }

    /// The configured display zone.
    pub const fn timezone(&self) -> Option<Tz> {
        self.timezone
    }
}

impl TemporalClassifier for CalendarClassifier {
    fn classify(&self, timestamp: &str) -> Result<TemporalKey> {
        let instant = parse_instant(timestamp).ok_or_else(|| RewindError::invalid_timestamp(timestamp))?;
        let local = match (instant, self.timezone) {
            (Instant::Zoned(dt), Some(tz)) => dt.with_timezone(&tz).naive_local(),
            (Instant::Zoned(dt), None) => dt.naive_local(),
            (Instant::Naive(naive), _) => naive,
        };
        Ok(TemporalKey::from_naive(&local))
    }
}

/// Classifies with the default [`CalendarClassifier`].
pub fn classify(timestamp: &str) -> Result<TemporalKey> {
    CalendarClassifier::new().classify(timestamp)
}

enum Instant {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_instant(raw: &str) -> Option<Instant> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    // Four-digit years and `YYYY-MM` read as dates, never as epoch values.
    if let Some(date) = reduced_date(text) {
        return date.and_hms_opt(0, 0, 0).map(Instant::Naive);
    }

    if is_epoch_millis(text) {
        let millis: i64 = text.parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| Instant::Zoned(dt.fixed_offset()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Instant::Zoned(dt));
    }

    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(Instant::Zoned(dt));
    }

    // A trailing `Z` on an otherwise naive shape is still UTC.
    let (body, utc) = match text.strip_suffix(['Z', 'z']) {
        Some(body) => (body, true),
        None => (text, false),
    };

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(body, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(if utc {
        Instant::Zoned(Utc.from_utc_datetime(&naive).fixed_offset())
    } else {
        Instant::Naive(naive)
    })
}

fn reduced_date(text: &str) -> Option<NaiveDate> {
    let (year, month) = match text.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (text, None),
    };
    if year.len() != 4 || !all_digits(year) {
        return None;
    }
    let month = match month {
        None => 1,
        Some(month) if month.len() == 2 && all_digits(month) => month.parse().ok()?,
        Some(_) => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

fn is_epoch_millis(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && all_digits(digits)
}
