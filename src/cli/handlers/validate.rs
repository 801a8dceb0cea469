//! Validate command handler: run a scene list through one continuity session.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::handlers::{parse_document, read_input};
use crate::cli::output::{
    format_confidence, output_json, print_header, print_kv, print_markdown_table, print_table,
    OutputMode,
};
use crate::init::AppContext;
use crate::models::{Scene, ValidationOutcome};
use crate::services::{AdvancePolicy, ContinuityValidator};

#[derive(Debug, Serialize)]
struct SceneValidation {
    scene_id: u64,
    location: String,
    #[serde(flatten)]
    outcome: ValidationOutcome,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    session_id: String,
    scenes: Vec<SceneValidation>,
    flagged: usize,
}

fn run_session(mut validator: ContinuityValidator, scenes: Vec<Scene>) -> ValidationReport {
    let session_id = validator.session_id().to_string();
    let results: Vec<SceneValidation> = scenes
        .into_iter()
        .map(|scene| {
            let scene_id = scene.id;
            let location = scene.location.clone();
            SceneValidation {
                scene_id,
                location,
                outcome: validator.validate(scene),
            }
        })
        .collect();
    let flagged = results.iter().filter(|r| r.outcome.ask_human).count();
    ValidationReport {
        session_id,
        scenes: results,
        flagged,
    }
}

pub async fn handle_validate(
    ctx: &AppContext,
    file: Option<&Path>,
    only_advance_on_ok: bool,
    mode: OutputMode,
) -> Result<()> {
    let contents = read_input(file)?;
    let scenes: Vec<Scene> = parse_document(&contents, file)?;

    let mut thresholds = ctx.config.continuity.clone();
    if only_advance_on_ok {
        thresholds.advance_policy = AdvancePolicy::OnlyWhenOk;
    }
    let validator = ContinuityValidator::with_thresholds(ctx.tone.clone(), thresholds);
    let report = run_session(validator, scenes);

    match mode {
        OutputMode::Json => output_json(&report),
        OutputMode::Markdown => {
            println!("# Continuity report\n");
            let rows = report
                .scenes
                .iter()
                .map(|r| {
                    vec![
                        r.scene_id.to_string(),
                        r.location.clone(),
                        format!("{:.2}", r.outcome.confidence),
                        if r.outcome.ask_human { "yes" } else { "" }.to_string(),
                        r.outcome.issues.join("; "),
                    ]
                })
                .collect();
            print_markdown_table(&["Scene", "Location", "Confidence", "Review", "Issues"], rows);
        }
        OutputMode::Human => {
            print_header("Continuity");
            let rows = report
                .scenes
                .iter()
                .map(|r| {
                    vec![
                        r.scene_id.to_string(),
                        r.location.clone(),
                        format_confidence(r.outcome.confidence, r.outcome.ask_human),
                        r.outcome.issues.join("\n"),
                    ]
                })
                .collect();
            print_table(&["Scene", "Location", "Confidence", "Issues"], rows);
            print_kv("Session", &report.session_id);
            print_kv(
                "Needs review",
                &format!("{} of {}", report.flagged, report.scenes.len()),
            );
        }
    }

    Ok(())
}
