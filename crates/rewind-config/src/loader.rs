//! Configuration loading utilities

use crate::schema::Config;
use rewind_common::{LogFormat, RewindError};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "REWIND_CONFIG_PATH";

/// File names probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["rewind.yaml", "rewind.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse { var: String, message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(RewindError),
}

impl From<ConfigError> for RewindError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the environment-named file, a default file in
    /// the working directory, or built-in defaults; then apply environment
    /// overrides and validate.
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Like [`ConfigLoader::load`], reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(path) = lookup(CONFIG_PATH_VAR) {
            Self::read_file(path)?
        } else if let Some(path) = DEFAULT_CONFIG_FILES.iter().map(Path::new).find(|p| p.exists()) {
            Self::read_file(path)?
        } else {
            info!("No configuration file found, using defaults");
            Config::default()
        };

        Self::apply_overrides(&mut config, &lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file with environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut config = Self::read_file(path)?;
        Self::apply_overrides(&mut config, &|key: &str| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text without overrides or validation
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("REWIND_BIND_ADDRESS") {
            config.server.bind_address = address;
        }

        if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|e| ConfigError::EnvParse {
                var: "PORT".to_string(),
                message: format!("{e}"),
            })?;
            config.server.bind_address = with_port(&config.server.bind_address, port);
        }

        if let Some(dir) = lookup("REWIND_STATIC_DIR") {
            config.server.static_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("REWIND_DATA_DIR") {
            config.data.directory = PathBuf::from(dir);
        }

        if let Some(files) = lookup("REWIND_DATA_FILES") {
            config.data.files = split_list(&files);
        }

        if let Some(artists) = lookup("REWIND_EXCLUDED_ARTISTS") {
            config.analysis.excluded_time_of_day_artists = split_list(&artists);
        }

        if let Some(zone) = lookup("REWIND_TIMEZONE") {
            let zone = zone.trim();
            config.analysis.timezone = (!zone.is_empty()).then(|| zone.to_string());
        }

        if let Some(level) = lookup("REWIND_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("REWIND_LOG_FORMAT") {
            config.logging.format = format.parse::<LogFormat>().map_err(|e| ConfigError::EnvParse {
                var: "REWIND_LOG_FORMAT".to_string(),
                message: e.to_string(),
            })?;
        }

        debug!("Applied environment overrides");
        Ok(())
    }
}

/// Replaces the port of a `host:port` address, or appends one.
fn with_port(address: &str, port: u16) -> String {
    let host = address.rsplit_once(':').map_or(address, |(host, _)| host);
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    format!("{host}:{port}")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissingArtistPolicy;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_with_port() {
        assert_eq!(with_port("0.0.0.0:3000", 8080), "0.0.0.0:8080");
        assert_eq!(with_port("127.0.0.1:1", 2), "127.0.0.1:2");
        assert_eq!(with_port("localhost", 9000), "localhost:9000");
        assert_eq!(with_port(":3000", 4000), "0.0.0.0:4000");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ConfigLoader::from_yaml_str(
            "analysis:\n  base_year: 2010\n  missing_artist_tracks: literal\n",
        )
        .unwrap();
        assert_eq!(config.analysis.base_year, 2010);
        assert_eq!(config.analysis.year_span, 11);
        assert_eq!(config.analysis.missing_artist_tracks, MissingArtistPolicy::Literal);
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let vars = lookup(&[
            ("PORT", "8080"),
            ("REWIND_DATA_DIR", "/srv/history"),
            ("REWIND_DATA_FILES", "a.json,b.json"),
            ("REWIND_EXCLUDED_ARTISTS", ""),
            ("REWIND_TIMEZONE", "Europe/Oslo"),
            ("REWIND_LOG_FORMAT", "json"),
        ]);

        ConfigLoader::apply_overrides(&mut config, &vars).unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.data.directory, PathBuf::from("/srv/history"));
        assert_eq!(config.data.files, vec!["a.json", "b.json"]);
        assert!(config.analysis.excluded_time_of_day_artists.is_empty());
        assert_eq!(config.analysis.timezone.as_deref(), Some("Europe/Oslo"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_port_is_reported() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(&mut config, &lookup(&[("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParse { ref var, .. } if var == "PORT"));
    }

    #[test]
    fn test_load_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "server:\n  bind_address: 127.0.0.1:9999\n").unwrap();

        let config = ConfigLoader::load_with(lookup(&[(
            CONFIG_PATH_VAR,
            path.to_str().unwrap(),
        )]))
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:9999");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = ConfigLoader::load_with(lookup(&[(CONFIG_PATH_VAR, "/nonexistent/rewind.yaml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rewind.yaml");
        std::fs::write(&path, "analysis:\n  year_span: 3\n").unwrap();
        let err = ConfigLoader::load_with(lookup(&[
            (CONFIG_PATH_VAR, path.to_str().unwrap()),
            ("REWIND_TIMEZONE", "Nowhere/Special"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
