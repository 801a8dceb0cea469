//! Test harness for data directory lifecycle.
//!
//! Provides an isolated data directory per test using tempfile.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use sceneweave::init::AppContext;
use sceneweave::services::{LexiconToneClassifier, MemorySink, TelemetryStore};
use sceneweave::StoryPipeline;

/// Isolated data directory with an optional config file.
///
/// The directory is automatically cleaned up when the harness is dropped.
pub struct TestHarness {
    pub temp_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Harness whose data directory contains `config.toml` with `contents`.
    pub fn with_config(contents: &str) -> Self {
        let harness = Self::new();
        std::fs::write(harness.path().join("config.toml"), contents)
            .expect("Failed to write config");
        harness
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(Some(self.path().to_path_buf())).expect("Failed to create context")
    }
}

/// Pipeline with the default lexicon, fresh telemetry and a memory sink.
pub fn pipeline_with_sink() -> (StoryPipeline, Arc<MemorySink>, Arc<TelemetryStore>) {
    let sink = Arc::new(MemorySink::new());
    let telemetry = Arc::new(TelemetryStore::new());
    let pipeline = StoryPipeline::new(Arc::new(LexiconToneClassifier::new()), telemetry.clone())
        .with_sink(sink.clone());
    (pipeline, sink, telemetry)
}
