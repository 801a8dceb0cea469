//! Duration estimators.
//!
//! Strategy-level estimates are clamped to `[3, 30]` seconds here. The
//! caller-configured per-shot bounds are applied later, after hard limits.

use crate::models::{AnalyzedScene, SceneType};
use crate::utils::text::word_count;

use super::config::{DurationStrategy, SegmentationConfig};

pub const WORDS_PER_SCRIPT_PAGE: f64 = 250.0;
pub const SECONDS_PER_SCRIPT_PAGE: f64 = 60.0;
pub const ESTIMATE_MIN_SECONDS: f64 = 3.0;
pub const ESTIMATE_MAX_SECONDS: f64 = 30.0;

const ANALYSIS_BASE_SECONDS: f64 = 5.0;
const DIALOGUE_WORDS_PER_MINUTE: f64 = 150.0;
const ACTION_WORDS_PER_MINUTE: f64 = 300.0;
const ACTION_FACTOR: f64 = 0.8;
const DIALOGUE_FACTOR: f64 = 1.2;

fn clamp_estimate(seconds: f64) -> f64 {
    seconds.clamp(ESTIMATE_MIN_SECONDS, ESTIMATE_MAX_SECONDS)
}

/// Script-based estimate: `words / 250` pages at 60 seconds per page.
pub fn script_duration(words: usize) -> f64 {
    clamp_estimate(words as f64 / WORDS_PER_SCRIPT_PAGE * SECONDS_PER_SCRIPT_PAGE)
}

/// Estimate for an analyzed scene from its dialogue and action word counts.
pub fn analysis_duration(scene: &AnalyzedScene) -> f64 {
    let dialogue_words: usize = scene.dialogue.iter().map(|line| word_count(line)).sum();
    let action_words = word_count(&scene.description);

    let mut seconds = ANALYSIS_BASE_SECONDS
        + dialogue_words as f64 / DIALOGUE_WORDS_PER_MINUTE * 60.0
        + action_words as f64 / ACTION_WORDS_PER_MINUTE * 60.0;

    match SceneType::from_label(&scene.scene_type) {
        Some(SceneType::Action) => seconds *= ACTION_FACTOR,
        Some(SceneType::Dialogue) => seconds *= DIALOGUE_FACTOR,
        _ => {}
    }

    clamp_estimate(seconds)
}

/// Per-call estimator for text-only strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimator {
    strategy: DurationStrategy,
    fixed_seconds: f64,
}

impl DurationEstimator {
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self {
            strategy: config.duration_strategy,
            fixed_seconds: config.fixed_duration_seconds,
        }
    }

    pub fn estimate(&self, text: &str) -> f64 {
        match self.strategy {
            DurationStrategy::ScriptBased => script_duration(word_count(text)),
            DurationStrategy::Fixed => self.fixed_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_script_duration_clamps() {
        assert_eq!(script_duration(0), 3.0);
        assert!((script_duration(50) - 12.0).abs() < 1e-9);
        assert_eq!(script_duration(200), 30.0);
    }

    #[test]
    fn test_analysis_duration_action_and_dialogue() {
        let action = AnalyzedScene {
            description: words(60),
            scene_type: "action".into(),
            ..Default::default()
        };
        // (5 + 60/300*60) * 0.8 = (5 + 12) * 0.8
        assert!((analysis_duration(&action) - 13.6).abs() < 1e-9);

        let dialogue = AnalyzedScene {
            description: words(30),
            dialogue: vec![words(15), words(15)],
            scene_type: "dialogue".into(),
            ..Default::default()
        };
        // (5 + 30/150*60 + 30/300*60) * 1.2 = (5 + 12 + 6) * 1.2
        assert!((analysis_duration(&dialogue) - 27.6).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_duration_bounds() {
        let empty = AnalyzedScene::default();
        assert_eq!(analysis_duration(&empty), 5.0);

        let long = AnalyzedScene {
            dialogue: vec![words(500)],
            ..Default::default()
        };
        assert_eq!(analysis_duration(&long), 30.0);

        let tiny_action = AnalyzedScene {
            scene_type: "action".into(),
            ..Default::default()
        };
        assert!((analysis_duration(&tiny_action) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_estimator() {
        let config = SegmentationConfig {
            duration_strategy: DurationStrategy::Fixed,
            fixed_duration_seconds: 8.0,
            ..Default::default()
        };
        let estimator = DurationEstimator::from_config(&config);
        assert_eq!(estimator.estimate(&words(1000)), 8.0);
    }
}
