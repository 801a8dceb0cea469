//! Story segmentation.
//!
//! [`SegmentationEngine::segment`] dispatches on the configured strategy,
//! falls back to basic word chunking whenever the strategy cannot run, and
//! then enforces the caller's hard limits. It never returns an error: every
//! degradation is reported as an [`Advisory`] on the result.

pub mod automatic;
pub mod classify;
pub mod config;
pub mod duration;
pub mod fallback;
pub mod limits;
pub mod manual;
pub mod per_beat;
pub mod per_scene;
pub mod strategy;

use tracing::{debug, info, warn};

use crate::error::Advisory;
use crate::models::{SegmentationResult, StructuredAnalysis};

pub use automatic::AutomaticSegmenter;
pub use config::{DurationStrategy, SegmentationConfig, SegmentationStrategy};
pub use duration::{analysis_duration, script_duration, DurationEstimator};
pub use fallback::BasicSegmenter;
pub use limits::apply_limits;
pub use manual::ManualSegmenter;
pub use per_beat::PerBeatSegmenter;
pub use per_scene::{parse_heading, PerSceneSegmenter, SceneHeading};
pub use strategy::{Segmenter, StrategyError, StrategyInput};

/// Stateless segmentation entry point. Safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentationEngine;

impl SegmentationEngine {
    pub fn new() -> Self {
        Self
    }

    fn segmenter_for(strategy: SegmentationStrategy) -> &'static dyn Segmenter {
        match strategy {
            SegmentationStrategy::Automatic => &AutomaticSegmenter,
            SegmentationStrategy::PerScene => &PerSceneSegmenter,
            SegmentationStrategy::PerBeat => &PerBeatSegmenter,
            SegmentationStrategy::Manual => &ManualSegmenter,
        }
    }

    pub fn segment(
        &self,
        text: &str,
        analysis: Option<&StructuredAnalysis>,
        config: &SegmentationConfig,
    ) -> SegmentationResult {
        let (config, mut advisories) = config.sanitized();

        if text.trim().is_empty() {
            warn!("Segmenting empty text");
            advisories.push(Advisory::EmptyText);
        }

        let input = StrategyInput {
            text,
            analysis,
            config: &config,
            estimator: DurationEstimator::from_config(&config),
        };

        let analysis_missing = analysis.map_or(true, StructuredAnalysis::is_empty);
        let segmenter: &dyn Segmenter =
            if config.strategy == SegmentationStrategy::Automatic && analysis_missing {
                info!("No structured analysis, using basic segmentation");
                advisories.push(Advisory::AnalysisUnavailable);
                &BasicSegmenter
            } else {
                Self::segmenter_for(config.strategy)
            };

        let (segments, strategy_used) = match segmenter.segment(&input) {
            Ok(segments) if !segments.is_empty() || text.trim().is_empty() => {
                (segments, segmenter.name())
            }
            outcome => {
                let reason = match outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => StrategyError::EmptyOutput.to_string(),
                };
                let advisory = Advisory::StrategyExecutionFailed {
                    strategy: segmenter.name().to_string(),
                    reason,
                };
                warn!("{}", advisory);
                advisories.push(advisory);
                let fallback = BasicSegmenter.segment(&input).unwrap_or_default();
                (fallback, BasicSegmenter.name())
            }
        };

        let segments = apply_limits(segments, &config);
        let total_duration = segments.iter().map(|s| s.estimated_duration).sum();
        debug!(
            strategy = strategy_used,
            segments = segments.len(),
            total_duration,
            "Segmentation complete"
        );

        SegmentationResult {
            segments,
            total_duration,
            strategy_used: strategy_used.to_string(),
            advisories,
        }
    }
}

/// Segment `text` with a fresh engine.
pub fn segment(
    text: &str,
    analysis: Option<&StructuredAnalysis>,
    config: &SegmentationConfig,
) -> SegmentationResult {
    SegmentationEngine::new().segment(text, analysis, config)
}
