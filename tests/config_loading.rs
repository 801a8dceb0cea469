//! Integration tests for configuration loading and data directory setup.

mod common;

use common::harness::TestHarness;
use pretty_assertions::assert_eq;
use sceneweave::config::{load_config, AppConfig};
use sceneweave::segmentation::{DurationStrategy, SegmentationStrategy};
use sceneweave::services::{AdvancePolicy, ToneBackend};

#[test]
fn test_missing_config_uses_defaults() {
    let harness = TestHarness::new();
    let config = load_config(harness.path());
    assert_eq!(config.segmentation, AppConfig::default().segmentation);
    assert_eq!(config.continuity.review_threshold, 0.6);
    assert_eq!(config.enhancer.default_prior, 0.8);
}

#[test]
fn test_full_config_file() {
    let harness = TestHarness::with_config(
        r#"
[segmentation]
strategy = "manual"
duration_strategy = "fixed"
fixed_duration_seconds = 4.0
manual_shot_count = 6
max_total_duration = 60.0

[continuity]
prop_penalty = 0.8
review_threshold = 0.5
advance_policy = "only_when_ok"

[enhancer]
emphasis_threshold = 0.3

[tone]
backend = "lexicon"
cache_capacity = 64

[tone.lexicon]
spooky = -0.75
"#,
    );
    let config = load_config(harness.path());
    assert_eq!(config.segmentation.strategy, SegmentationStrategy::Manual);
    assert_eq!(config.segmentation.duration_strategy, DurationStrategy::Fixed);
    assert_eq!(config.segmentation.manual_shot_count, 6);
    assert_eq!(config.segmentation.max_total_duration, Some(60.0));
    assert_eq!(config.continuity.prop_penalty, 0.8);
    assert_eq!(config.continuity.character_penalty, 0.5);
    assert_eq!(config.continuity.advance_policy, AdvancePolicy::OnlyWhenOk);
    assert_eq!(config.enhancer.emphasis_threshold, 0.3);
    assert_eq!(config.tone.backend, ToneBackend::Lexicon);
    assert_eq!(config.tone.lexicon.get("spooky"), Some(&-0.75));
}

#[test]
fn test_context_builds_custom_tone_classifier() {
    let harness = TestHarness::with_config(
        r#"
[tone.lexicon]
spooky = -0.75
"#,
    );
    let ctx = harness.context();
    assert_eq!(ctx.tone.score("spooky"), -0.75);
    assert!(ctx.telemetry.store().is_empty());
    assert_eq!(ctx.data_path, harness.path());
}

#[test]
fn test_context_validator_uses_thresholds() {
    let harness = TestHarness::with_config(
        r#"
[continuity]
review_threshold = 0.9
"#,
    );
    let ctx = harness.context();
    assert_eq!(ctx.validator().thresholds().review_threshold, 0.9);
}
