//! Integration tests for rewind-common crate.

use rewind_common::{
    format_duration, format_hours, track_key, ContentType, LogFormat, LoggingConfig, PlayEvent,
    RawPlayRecord, RewindError,
};
use serde_json::json;

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0h 0m");
    assert_eq!(format_duration(59_999), "0h 0m");
    assert_eq!(format_duration(3_660_000), "1h 1m");
    assert_eq!(format_duration(90 * 3_600_000 + 59 * 60_000 + 999), "90h 59m");
}

#[test]
fn test_format_hours() {
    assert_eq!(format_hours(0), "0.00");
    assert_eq!(format_hours(5_400_000), "1.50");
}

#[test]
fn test_play_event_builders() {
    let event = PlayEvent::new("2020-01-01T00:00:00Z", 10)
        .with_track("Song")
        .with_artist("Artist")
        .with_album("Album");

    assert_eq!(event.content_type(), ContentType::Music);
    assert_eq!(event.track_with_artist().as_deref(), Some("Song by Artist"));
    assert_eq!(track_key("Song", ""), "Song by ");

    let podcast = PlayEvent::new("2020-01-01T00:00:00Z", 10).with_episode("Pilot");
    assert_eq!(podcast.content_type(), ContentType::Podcast);
    assert_eq!(podcast.track_with_artist(), None);
}

#[test]
fn test_raw_record_tolerates_wrong_types() {
    let raw: RawPlayRecord = serde_json::from_value(json!({
        "ts": 12,
        "ms_played": "oops",
        "master_metadata_track_name": 5,
        "episode_name": { "nested": true }
    }))
    .unwrap();

    assert_eq!(raw.ts, Some(json!(12)));
    assert_eq!(raw.master_metadata_track_name, None);
    assert_eq!(raw.episode_name, None);
}

#[test]
fn test_logging_config_from_yaml_shape() {
    let config: LoggingConfig = serde_json::from_value(json!({ "format": "json" })).unwrap();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "info");
    assert!(config.include_targets);
}

#[test]
fn test_error_helpers() {
    let err = RewindError::data_load("data/data3.json", "not an array");
    assert!(err.is_data_load());
    assert_eq!(
        err.to_string(),
        "Failed to load history data from data/data3.json: not an array"
    );
}
