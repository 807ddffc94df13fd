//! Loading of the history export shards.

use rewind_common::{PlayEvent, Result, RewindError};
use rewind_config::DataConfig;
use rewind_engine::normalize_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Reads the configured shards and merges them in order.
#[derive(Debug, Clone)]
pub struct HistoryLoader {
    shards: Vec<PathBuf>,
}

impl HistoryLoader {
    /// Creates a loader over explicit shard paths.
    pub const fn new(shards: Vec<PathBuf>) -> Self {
        Self { shards }
    }

    /// Creates a loader over the configured shards.
    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.shard_paths())
    }

    /// Shard paths in merge order.
    pub fn shards(&self) -> &[PathBuf] {
        &self.shards
    }

    /// Reads every shard and concatenates their records.
    ///
    /// Any unreadable shard, or one that is not a JSON array, fails the
    /// whole load.
    #[instrument(skip(self), fields(shards = self.shards.len()))]
    pub async fn load_records(&self) -> Result<Vec<Value>> {
        let mut merged = Vec::new();
        for path in &self.shards {
            let records = read_shard(path).await?;
            info!("Loaded {} records from {}", records.len(), path.display());
            merged.extend(records);
        }

        info!("Merged history holds {} records", merged.len());
        if merged.is_empty() {
            warn!("No play records found in any shard");
        }
        Ok(merged)
    }

    /// Reads every shard and normalizes the merged records.
    pub async fn load_events(&self) -> Result<Vec<PlayEvent>> {
        let records = self.load_records().await?;
        let events = normalize_all(Value::Array(records));
        debug!("Loaded {} play events", events.len());
        Ok(events)
    }
}

async fn read_shard(path: &Path) -> Result<Vec<Value>> {
    let name = path.display().to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RewindError::data_load_with_source(&name, "could not read shard", e))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| RewindError::data_load_with_source(&name, "shard is not valid JSON", e))?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(RewindError::data_load(name, "shard is not a JSON array")),
    }
}
