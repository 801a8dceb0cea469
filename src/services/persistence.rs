//! Hand-off point for durable storage.
//!
//! The core never reads anything back and never depends on storage
//! succeeding: callers log sink failures and carry on.

use std::sync::Mutex;

use crate::error::SceneweaveError;
use crate::models::{ContinuityIssue, Scene, TelemetryRecord};

/// Receiver for records produced by the continuity core.
pub trait PersistenceSink: Send + Sync {
    fn persist_scene(&self, scene: &Scene) -> Result<(), SceneweaveError>;

    fn persist_issue(&self, issue: &ContinuityIssue) -> Result<(), SceneweaveError>;

    fn persist_telemetry(&self, record: &TelemetryRecord) -> Result<(), SceneweaveError>;
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl PersistenceSink for NoopSink {
    fn persist_scene(&self, _scene: &Scene) -> Result<(), SceneweaveError> {
        Ok(())
    }

    fn persist_issue(&self, _issue: &ContinuityIssue) -> Result<(), SceneweaveError> {
        Ok(())
    }

    fn persist_telemetry(&self, _record: &TelemetryRecord) -> Result<(), SceneweaveError> {
        Ok(())
    }
}

/// In-memory sink, handy for hosts that batch writes and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    scenes: Mutex<Vec<Scene>>,
    issues: Mutex<Vec<ContinuityIssue>>,
    telemetry: Mutex<Vec<TelemetryRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenes(&self) -> Vec<Scene> {
        self.scenes.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn issues(&self) -> Vec<ContinuityIssue> {
        self.issues.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn telemetry(&self) -> Vec<TelemetryRecord> {
        self.telemetry.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

fn push<T: Clone>(target: &Mutex<Vec<T>>, item: &T) -> Result<(), SceneweaveError> {
    target
        .lock()
        .map_err(|e| SceneweaveError::Persistence(format!("Sink lock poisoned: {}", e)))?
        .push(item.clone());
    Ok(())
}

impl PersistenceSink for MemorySink {
    fn persist_scene(&self, scene: &Scene) -> Result<(), SceneweaveError> {
        push(&self.scenes, scene)
    }

    fn persist_issue(&self, issue: &ContinuityIssue) -> Result<(), SceneweaveError> {
        push(&self.issues, issue)
    }

    fn persist_telemetry(&self, record: &TelemetryRecord) -> Result<(), SceneweaveError> {
        push(&self.telemetry, record)
    }
}
