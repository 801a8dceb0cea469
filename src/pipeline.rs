//! End-to-end story processing.
//!
//! Raw text goes through the segmentation engine; each resulting segment is
//! turned into a [`Scene`], validated against its predecessor in index order,
//! and its prompt extended by the prompt enhancer. One pipeline owns one
//! continuity session, so one pipeline per story.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Advisory;
use crate::models::{Scene, Segment, StructuredAnalysis, TelemetryRecord};
use crate::segmentation::{SegmentationConfig, SegmentationEngine};
use crate::services::{
    ContinuityThresholds, ContinuityValidator, EnhancerConfig, PersistenceSink, PromptEnhancer,
    TelemetryStore, ToneClassifier,
};
use crate::utils::sanitize::split_list;

/// Prompt and timing for one shot, ready for a generation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPrompt {
    pub index: usize,
    pub prompt: String,
    pub duration_seconds: f64,
    pub confidence: f64,
    pub ask_human: bool,
    pub issues: Vec<String>,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub strategy_used: String,
    pub shots: Vec<ShotPrompt>,
    pub total_duration: f64,
    pub advisories: Vec<Advisory>,
}

impl PipelineReport {
    /// Shots that should be reviewed before generation.
    pub fn flagged(&self) -> impl Iterator<Item = &ShotPrompt> {
        self.shots.iter().filter(|s| s.ask_human)
    }
}

pub struct StoryPipeline {
    engine: SegmentationEngine,
    segmentation: SegmentationConfig,
    validator: ContinuityValidator,
    enhancer: PromptEnhancer,
    telemetry: Arc<TelemetryStore>,
    sink: Option<Arc<dyn PersistenceSink>>,
    next_scene_id: u64,
}

impl StoryPipeline {
    pub fn new(tone: Arc<dyn ToneClassifier>, telemetry: Arc<TelemetryStore>) -> Self {
        Self {
            engine: SegmentationEngine::new(),
            segmentation: SegmentationConfig::default(),
            validator: ContinuityValidator::new(tone),
            enhancer: PromptEnhancer::default(),
            telemetry,
            sink: None,
            next_scene_id: 0,
        }
    }

    pub fn with_segmentation(mut self, config: SegmentationConfig) -> Self {
        self.segmentation = config;
        self
    }

    pub fn with_enhancer(mut self, config: EnhancerConfig) -> Self {
        self.enhancer = PromptEnhancer::new(config);
        self
    }

    /// Replaces the validator, starting a new continuity session.
    pub fn with_thresholds(
        mut self,
        tone: Arc<dyn ToneClassifier>,
        thresholds: ContinuityThresholds,
    ) -> Self {
        self.validator = ContinuityValidator::with_thresholds(tone, thresholds);
        if let Some(sink) = &self.sink {
            self.validator = self.validator.with_sink(Arc::clone(sink));
        }
        self.next_scene_id = 0;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn PersistenceSink>) -> Self {
        self.validator = self.validator.with_sink(Arc::clone(&sink));
        self.sink = Some(sink);
        self
    }

    pub fn validator(&self) -> &ContinuityValidator {
        &self.validator
    }

    pub fn telemetry(&self) -> &TelemetryStore {
        &self.telemetry
    }

    /// Segment, validate and enhance a story.
    ///
    /// Scenes carry on from any earlier `run` on the same pipeline, so a
    /// story can be fed in chapters.
    pub fn run(&mut self, text: &str, analysis: Option<&StructuredAnalysis>) -> PipelineReport {
        let result = self.engine.segment(text, analysis, &self.segmentation);
        info!(
            "Segmented story into {} shot(s) using {}",
            result.segments.len(),
            result.strategy_used
        );

        let mut shots = Vec::with_capacity(result.segments.len());
        for segment in &result.segments {
            let scene = scene_from_segment(self.next_scene_id, segment);
            self.next_scene_id += 1;
            let previous = self.validator.previous().cloned();
            let outcome = self.validator.validate(scene.clone());
            let prompt = self
                .enhancer
                .enhance(&scene, previous.as_ref(), &self.telemetry);

            debug!("Shot {} prompt: {}", segment.index, prompt);
            shots.push(ShotPrompt {
                index: segment.index,
                prompt,
                duration_seconds: segment.estimated_duration,
                confidence: outcome.confidence,
                ask_human: outcome.ask_human,
                issues: outcome.issues,
            });
        }

        PipelineReport {
            strategy_used: result.strategy_used,
            shots,
            total_duration: result.total_duration,
            advisories: result.advisories,
        }
    }

    /// Feed back whether `token` showed up in a generated shot.
    pub fn record_outcome(&self, token: &str, appeared: bool) -> Option<TelemetryRecord> {
        let record = self.telemetry.record_outcome(token, appeared)?;
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist_telemetry(&record) {
                warn!("Failed to persist telemetry for '{}': {}", record.token, e);
            }
        }
        Some(record)
    }
}

/// Build the validator's view of a segment.
///
/// Location, characters and props come from segment metadata. The tone is the
/// analysis' emotional tone when present, otherwise the segment text itself.
pub fn scene_from_segment(id: u64, segment: &Segment) -> Scene {
    let mut scene = Scene::new(id, segment.meta("location").unwrap_or_default());
    scene.characters = segment
        .meta("characters")
        .map(split_list)
        .unwrap_or_default()
        .into_iter()
        .collect();
    scene.props = segment
        .meta("props")
        .map(split_list)
        .unwrap_or_default()
        .into_iter()
        .collect();
    scene.tone = segment
        .meta("emotional_tone")
        .unwrap_or(segment.text.as_str())
        .to_string();
    scene.prompt = match segment.suggested_shot_type {
        Some(shot) => format!("{}, {} shot", segment.text.trim(), shot),
        None => segment.text.trim().to_string(),
    };
    scene
}
