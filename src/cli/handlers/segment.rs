//! Segment command handler: one or many story files, segmented concurrently.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::handlers::{load_analysis, read_input};
use crate::cli::output::{
    create_spinner, output_json, output_json_list, print_advisories, print_header, print_kv,
    print_markdown_table, print_table, truncate, DetailLevel, OutputMode,
};
use crate::cli::SegmentationArgs;
use crate::init::AppContext;
use crate::models::{Segment, SegmentationResult};
use crate::segmentation::SegmentationEngine;

#[derive(Debug, Serialize)]
struct FileSegmentation {
    source: String,
    #[serde(flatten)]
    result: SegmentationResult,
}

pub async fn handle_segment(
    ctx: &AppContext,
    files: &[PathBuf],
    args: &SegmentationArgs,
    mode: OutputMode,
    detail: DetailLevel,
) -> Result<()> {
    let config = args.apply(&ctx.config.segmentation);
    let analysis = load_analysis(args.analysis.as_deref())?;

    let inputs: Vec<(String, String)> = if files.is_empty() {
        vec![("stdin".to_string(), read_input(None)?)]
    } else {
        files
            .iter()
            .map(|path| -> Result<(String, String)> {
                Ok((path.display().to_string(), read_input(Some(path))?))
            })
            .collect::<Result<_>>()?
    };

    let spinner = create_spinner(&format!("Segmenting {} story file(s)...", inputs.len()));
    let engine = SegmentationEngine::new();
    let tasks = inputs.into_iter().map(|(source, text)| {
        let config = config.clone();
        let analysis = analysis.clone();
        tokio::task::spawn_blocking(move || FileSegmentation {
            result: engine.segment(&text, analysis.as_ref(), &config),
            source,
        })
    });
    let outputs = futures::future::join_all(tasks)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Segmentation task failed: {}", e))?;
    spinner.finish_and_clear();

    match mode {
        OutputMode::Json => {
            if let [single] = outputs.as_slice() {
                output_json(&single.result);
            } else {
                output_json_list(&outputs);
            }
        }
        OutputMode::Markdown => {
            for output in &outputs {
                println!("## {}\n", output.source);
                print_markdown_table(&headers(detail), rows(&output.result.segments, detail));
                println!(
                    "\n**Total:** {:.1}s, **strategy:** {}\n",
                    output.result.total_duration, output.result.strategy_used
                );
                for advisory in &output.result.advisories {
                    println!("> {}", advisory);
                }
            }
        }
        OutputMode::Human => {
            for output in &outputs {
                print_header(&format!("Segments: {}", output.source));
                print_table(&headers(detail), rows(&output.result.segments, detail));
                print_kv(
                    "Total duration",
                    &format!("{:.1}s", output.result.total_duration),
                );
                let strategy = if output.result.used_fallback() {
                    output.result.strategy_used.yellow().to_string()
                } else {
                    output.result.strategy_used.clone()
                };
                print_kv("Strategy", &strategy);
                print_advisories(&output.result.advisories);
            }
        }
    }

    Ok(())
}

fn headers(detail: DetailLevel) -> Vec<&'static str> {
    match detail {
        DetailLevel::Brief => vec!["#", "Duration", "Text"],
        DetailLevel::Standard => vec!["#", "Duration", "Type", "Shot", "Pacing", "Transition", "Text"],
        DetailLevel::Full => vec![
            "#", "Duration", "Type", "Shot", "Pacing", "Transition", "Text", "Metadata",
        ],
    }
}

fn rows(segments: &[Segment], detail: DetailLevel) -> Vec<Vec<String>> {
    segments
        .iter()
        .map(|s| {
            let mut row = vec![
                s.index.to_string(),
                format!("{:.1}s", s.estimated_duration),
            ];
            if detail != DetailLevel::Brief {
                row.push(s.scene_type.map(|t| t.to_string()).unwrap_or_default());
                row.push(
                    s.suggested_shot_type
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                );
                row.push(s.pacing.clone());
                row.push(s.transition_hint.clone().unwrap_or_default());
            }
            row.push(truncate(&s.text, detail.preview_len()));
            if detail == DetailLevel::Full {
                row.push(
                    s.metadata
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
            row
        })
        .collect()
}
