//! Conversion of raw export records into [`PlayEvent`]s.
//!
//! Normalization never rejects a record. Fields that are missing, `null`,
//! empty, or of the wrong type become `None`; a duration that cannot be read
//! becomes zero.

use rewind_common::{PlayEvent, RawPlayRecord};
use serde_json::Value;
use tracing::{debug, warn};

/// Normalizes one typed export record.
pub fn normalize(raw: RawPlayRecord) -> PlayEvent {
    PlayEvent {
        timestamp: raw.ts.as_ref().and_then(timestamp_text),
        ms_played: raw.ms_played.as_ref().map_or(0, duration_ms),
        track_name: non_empty(raw.master_metadata_track_name),
        artist_name: non_empty(raw.master_metadata_album_artist_name),
        album_name: non_empty(raw.master_metadata_album_album_name),
        episode_name: non_empty(raw.episode_name),
    }
}

/// Normalizes one JSON value; anything that is not an object yields a
/// default event.
pub fn normalize_value(value: Value) -> PlayEvent {
    match value {
        Value::Object(_) => serde_json::from_value::<RawPlayRecord>(value)
            .map(normalize)
            .unwrap_or_default(),
        _ => PlayEvent::default(),
    }
}

/// Normalizes a whole payload. A payload that is not an array yields no
/// events.
pub fn normalize_all(payload: Value) -> Vec<PlayEvent> {
    match payload {
        Value::Array(records) => {
            let events: Vec<PlayEvent> = records.into_iter().map(normalize_value).collect();
            debug!("Normalized {} play events", events.len());
            events
        }
        other => {
            warn!("Expected an array of play records, got {}", kind(&other));
            Vec::new()
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .map(|ms| ms.to_string())
            .or_else(|| n.as_f64().map(|ms| format!("{}", ms.trunc()))),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_ms(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|ms| ms.is_finite() && *ms > 0.0)
                .map_or(0, |ms| ms.trunc() as u64)
        }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map_or(0, |ms| ms.trunc() as u64),
        _ => 0,
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
