//! Duration conversion and formatting helpers.

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60 * 1000;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Converts milliseconds to fractional hours for chart axes.
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// Formats milliseconds as whole hours and minutes, e.g. `"3h 5m"`.
pub fn format_duration(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{hours}h {minutes}m")
}

/// Formats milliseconds as hours with two decimals, e.g. `"12.50"`.
pub fn format_hours(ms: u64) -> String {
    format!("{:.2}", ms_to_hours(ms))
}
