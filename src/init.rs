//! Shared initialization logic for CLI commands.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{load_config, resolve_data_path, AppConfig};
use crate::pipeline::StoryPipeline;
use crate::services::{create_tone_classifier, ContinuityValidator, ToneClassifier};
use crate::session::TelemetryStateManager;

pub const TELEMETRY_FILE_NAME: &str = "telemetry.json";

/// Application context holding configuration and shared services.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: AppConfig,
    pub tone: Arc<dyn ToneClassifier>,
    pub telemetry: Arc<TelemetryStateManager>,
}

impl AppContext {
    /// Initialize application context.
    ///
    /// Data path priority: explicit path > SCENEWEAVE_DATA_PATH env > ./.sceneweave (if exists) > ~/.sceneweave
    pub fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = resolve_data_path(explicit_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path);

        let tone = create_tone_classifier(&config.tone);

        let telemetry_path = data_path.join(TELEMETRY_FILE_NAME);
        let telemetry = Arc::new(TelemetryStateManager::load_or_create(&telemetry_path)?);
        tracing::info!("Telemetry loaded ({} tokens)", telemetry.store().len());

        Ok(Self {
            data_path,
            config,
            tone,
            telemetry,
        })
    }

    /// A validator for one continuity session, configured from `config.continuity`.
    pub fn validator(&self) -> ContinuityValidator {
        ContinuityValidator::with_thresholds(Arc::clone(&self.tone), self.config.continuity.clone())
    }

    /// A pipeline sharing this context's tone classifier and telemetry.
    pub fn pipeline(&self) -> StoryPipeline {
        StoryPipeline::new(Arc::clone(&self.tone), self.telemetry.store())
            .with_segmentation(self.config.segmentation.clone())
            .with_enhancer(self.config.enhancer.clone())
            .with_thresholds(Arc::clone(&self.tone), self.config.continuity.clone())
    }
}
