use crate::error::SceneweaveError;
use crate::models::TelemetryRecord;
use crate::services::TelemetryStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Telemetry snapshot that persists across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryState {
    /// When the snapshot was last written (None for a fresh store)
    pub last_saved: Option<DateTime<Utc>>,
    /// Per-token outcome history, sorted by token
    pub records: Vec<TelemetryRecord>,
}

/// Loads the shared telemetry store from disk and writes it back.
pub struct TelemetryStateManager {
    /// Path to the telemetry JSON file
    state_path: PathBuf,
    store: Arc<TelemetryStore>,
    last_saved: RwLock<Option<DateTime<Utc>>>,
}

impl TelemetryStateManager {
    /// Load telemetry from disk or start with an empty store.
    pub fn load_or_create(path: &Path) -> Result<Self, SceneweaveError> {
        let state: TelemetryState = if path.exists() {
            let json = std::fs::read_to_string(path)?;

            serde_json::from_str(&json).map_err(|e| {
                SceneweaveError::Persistence(format!("Failed to parse telemetry state: {}", e))
            })?
        } else {
            TelemetryState::default()
        };

        tracing::debug!(
            "Loaded {} telemetry record(s) from {}",
            state.records.len(),
            path.display()
        );

        Ok(Self {
            state_path: path.to_path_buf(),
            store: Arc::new(TelemetryStore::from_records(state.records)),
            last_saved: RwLock::new(state.last_saved),
        })
    }

    /// The live store. Outcomes recorded here are included in the next `save`.
    pub fn store(&self) -> Arc<TelemetryStore> {
        Arc::clone(&self.store)
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Persist current counters to disk.
    pub async fn save(&self) -> Result<(), SceneweaveError> {
        let mut last_saved = self.last_saved.write().await;
        let now = Utc::now();
        let state = TelemetryState {
            last_saved: Some(now),
            records: self.store.snapshot(),
        };
        let json = serde_json::to_string_pretty(&state).map_err(|e| {
            SceneweaveError::Persistence(format!("Failed to serialize telemetry state: {}", e))
        })?;

        // Ensure parent directory exists
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.state_path, json)?;

        *last_saved = Some(now);
        Ok(())
    }

    /// When the snapshot on disk was last written.
    pub async fn last_saved(&self) -> Option<DateTime<Utc>> {
        *self.last_saved.read().await
    }
}
