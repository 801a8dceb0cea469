//! Integration tests for the segment -> validate -> enhance workflow.

mod common;

use common::builders::{AnalysisBuilder, SCREENPLAY};
use common::harness::{pipeline_with_sink, TestHarness};
use pretty_assertions::assert_eq;
use sceneweave::segmentation::SegmentationStrategy;
use sceneweave::services::{EnhancerConfig, PromptEnhancer, TelemetryStore};
use sceneweave::SegmentationConfig;

fn lantern_analysis() -> sceneweave::models::StructuredAnalysis {
    AnalysisBuilder::new()
        .scene("A keeper climbs the lighthouse stairs.", "Lighthouse", "establishing")
        .with(|s| {
            s.characters = vec!["Keeper".into()];
            s.props = vec!["lantern".into()];
            s.emotional_tone = "calm".into();
        })
        .scene("The keeper lights the great lamp.", "Lighthouse", "action")
        .with(|s| {
            s.characters = vec!["Keeper".into()];
            s.props = vec!["lantern".into()];
            s.emotional_tone = "hopeful".into();
        })
        .scene("Something moves in the dark water below.", "Lighthouse", "transition")
        .with(|s| {
            s.emotional_tone = "terrifying".into();
        })
        .build()
}

#[test]
fn test_full_story_flow() {
    let (mut pipeline, sink, _telemetry) = pipeline_with_sink();
    let report = pipeline.run("", Some(&lantern_analysis()));

    assert_eq!(report.shots.len(), 3);
    assert_eq!(report.shots[0].confidence, 1.0);
    assert_eq!(report.shots[1].confidence, 1.0);
    assert!(report.shots[1]
        .prompt
        .contains("Keeper with same appearance as previous scene"));

    // lantern and keeper gone, tone jumps from hopeful to terrifying
    let last = &report.shots[2];
    assert!((last.confidence - 0.7 * 0.5 * 0.6).abs() < 1e-9);
    assert!(last.ask_human);
    assert_eq!(last.issues.len(), 3);

    assert_eq!(sink.scenes().len(), 3);
    assert_eq!(sink.issues().len(), 1);
}

#[test]
fn test_feedback_loop_emphasizes_failing_props() {
    let (mut first_story, _sink, telemetry) = pipeline_with_sink();
    let report = first_story.run("", Some(&lantern_analysis()));
    assert!(!report.shots[0].prompt.contains("CLEARLY SHOWING"));

    // the lantern keeps failing to render
    for _ in 0..3 {
        first_story.record_outcome("Lantern", false);
    }
    first_story.record_outcome("lantern", true);
    assert_eq!(telemetry.manifestation_rate("lantern"), Some(0.25));

    let enhancer = PromptEnhancer::new(EnhancerConfig::default());
    let scene = sceneweave::pipeline::scene_from_segment(
        0,
        &sceneweave::segment(
            "",
            Some(&lantern_analysis()),
            &SegmentationConfig::default(),
        )
        .segments[0],
    );
    let prompt = enhancer.enhance(&scene, None, &telemetry);
    assert!(prompt.starts_with(&scene.prompt));
    assert!(prompt.ends_with(", CLEARLY SHOWING lantern"));
}

#[test]
fn test_shared_telemetry_across_concurrent_sessions() {
    let telemetry = std::sync::Arc::new(TelemetryStore::new());
    std::thread::scope(|scope| {
        for worker in 0..4 {
            let telemetry = telemetry.clone();
            scope.spawn(move || {
                for i in 0..250 {
                    telemetry.record_outcome("wand", (i + worker) % 2 == 0);
                }
            });
        }
    });
    let record = telemetry.record("wand").unwrap();
    assert_eq!(record.attempts, 1000);
    assert_eq!(record.successes, 500);
}

#[tokio::test]
async fn test_context_pipeline_uses_config_and_persists_feedback() {
    let harness = TestHarness::with_config(
        r#"
[segmentation]
strategy = "per_scene"
max_shots = 2
"#,
    );
    let ctx = harness.context();
    assert_eq!(ctx.config.segmentation.strategy, SegmentationStrategy::PerScene);

    let mut pipeline = ctx.pipeline();
    let report = pipeline.run(SCREENPLAY, None);
    assert_eq!(report.strategy_used, "per_scene");
    assert_eq!(report.shots.len(), 2);

    pipeline.record_outcome("lantern", false);
    ctx.telemetry.save().await.unwrap();

    let reloaded = harness.context();
    assert_eq!(
        reloaded.telemetry.store().manifestation_rate("lantern"),
        Some(0.0)
    );
}
