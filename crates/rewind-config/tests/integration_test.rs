//! Integration tests for rewind-config crate.

use rewind_config::{Config, ConfigError, ConfigLoader, MissingArtistPolicy};
use rewind_common::{LogFormat, RewindError};
use std::path::PathBuf;

#[test]
fn test_default_config_validates() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    assert_eq!(config.server.static_dir, PathBuf::from("public"));
    assert_eq!(config.data.files.len(), 5);
}

#[test]
fn test_full_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.yaml");
    std::fs::write(
        &path,
        r"
server:
  bind_address: 127.0.0.1:8000
  static_dir: web
data:
  directory: /var/lib/rewind
  files: [history.json]
analysis:
  base_year: 2016
  year_span: 9
  excluded_time_of_day_artists: []
  missing_artist_tracks: blank
  timezone: Europe/Berlin
  limits:
    summary_tracks: 20
logging:
  level: debug
  format: compact
",
    )
    .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let config = ConfigLoader::from_yaml_str(&content).unwrap();
    config.validate().unwrap();

    assert_eq!(config.server.bind_address, "127.0.0.1:8000");
    assert_eq!(
        config.data.shard_paths(),
        vec![PathBuf::from("/var/lib/rewind/history.json")]
    );
    assert_eq!(config.analysis.base_year, 2016);
    assert!(config.analysis.excluded_time_of_day_artists.is_empty());
    assert_eq!(config.analysis.missing_artist_tracks, MissingArtistPolicy::Blank);
    assert_eq!(config.analysis.limits.summary_tracks, 20);
    assert_eq!(config.analysis.limits.summary_albums, 10);
    assert_eq!(config.logging.format, LogFormat::Compact);
}

#[test]
fn test_malformed_yaml() {
    let err = ConfigLoader::from_yaml_str("server: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let err = ConfigLoader::from_yaml_str("analysis:\n  missing_artist_tracks: guess\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_oversized_year_span_is_rejected() {
    let config = ConfigLoader::from_yaml_str("analysis:\n  year_span: 1000000000\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));

    let err: RewindError = err.into();
    assert!(matches!(err, RewindError::Config { .. }));
    assert!(err.to_string().contains("Failed to load configuration"));
}
