//! Pipeline command handler: segment, validate and enhance one story.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::handlers::{load_analysis, read_input};
use crate::cli::output::{
    create_spinner, format_confidence, output_json, print_advisories, print_header, print_hint,
    print_kv, print_markdown_table, print_table, truncate, DetailLevel, OutputMode,
};
use crate::cli::SegmentationArgs;
use crate::init::AppContext;
use crate::pipeline::PipelineReport;

pub async fn handle_pipeline(
    ctx: &AppContext,
    file: Option<&Path>,
    args: &SegmentationArgs,
    mode: OutputMode,
    detail: DetailLevel,
) -> Result<()> {
    let text = read_input(file)?;
    let analysis = load_analysis(args.analysis.as_deref())?;
    let mut pipeline = ctx
        .pipeline()
        .with_segmentation(args.apply(&ctx.config.segmentation));

    let spinner = create_spinner("Building shot prompts...");
    let report = tokio::task::spawn_blocking(move || pipeline.run(&text, analysis.as_ref()))
        .await
        .map_err(|e| anyhow::anyhow!("Pipeline task failed: {}", e))?;
    spinner.finish_and_clear();

    match mode {
        OutputMode::Json => output_json(&report),
        OutputMode::Markdown => print_markdown(&report),
        OutputMode::Human => print_human(&report, detail),
    }

    Ok(())
}

fn print_human(report: &PipelineReport, detail: DetailLevel) {
    print_header("Shot Prompts");
    let rows: Vec<Vec<String>> = report
        .shots
        .iter()
        .map(|shot| {
            vec![
                shot.index.to_string(),
                format!("{:.1}s", shot.duration_seconds),
                format_confidence(shot.confidence, shot.ask_human),
                truncate(&shot.prompt, detail.preview_len().map(|n| n * 2)),
            ]
        })
        .collect();
    print_table(&["#", "Duration", "Confidence", "Prompt"], rows);

    print_kv("Total duration", &format!("{:.1}s", report.total_duration));
    print_kv("Strategy", &report.strategy_used);
    print_advisories(&report.advisories);

    let flagged: Vec<_> = report.flagged().collect();
    if flagged.is_empty() {
        return;
    }
    println!();
    println!("{}", "Needs review:".red().bold());
    for shot in flagged {
        println!("  Shot {}:", shot.index);
        for issue in &shot.issues {
            println!("    - {}", issue);
        }
    }
    print_hint("Edit the flagged scenes or accept them before generating.");
}

fn print_markdown(report: &PipelineReport) {
    println!("# Shot Prompts\n");
    let rows: Vec<Vec<String>> = report
        .shots
        .iter()
        .map(|shot| {
            let review = if shot.ask_human { "yes" } else { "" };
            vec![
                shot.index.to_string(),
                format!("{:.1}s", shot.duration_seconds),
                format!("{:.2}", shot.confidence),
                review.to_string(),
                shot.prompt.clone(),
            ]
        })
        .collect();
    print_markdown_table(&["#", "Duration", "Confidence", "Review", "Prompt"], rows);
    println!(
        "\n**Total:** {:.1}s, **strategy:** {}",
        report.total_duration, report.strategy_used
    );

    for shot in report.flagged() {
        println!("\n### Shot {} issues\n", shot.index);
        for issue in &shot.issues {
            println!("- {}", issue);
        }
    }
}
