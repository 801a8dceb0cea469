//! Sceneweave - narrative continuity and segmentation engine
//!
//! Usage:
//!   sceneweave segment story.txt           Split a story into timed segments
//!   sceneweave segment -s per_beat a b c   Segment several files concurrently
//!   sceneweave pipeline story.txt          Segment, validate and build shot prompts
//!   sceneweave validate scenes.yaml        Continuity check for a scene list
//!   sceneweave feedback wand --missing     Record a generation outcome
//!   sceneweave --help                      Show all commands

use anyhow::Result;
use clap::Parser;

use sceneweave::cli::output::{DetailLevel, OutputMode};
use sceneweave::cli::Cli;
use sceneweave::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sceneweave=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_flags(cli.json, cli.md);
    let detail = DetailLevel::from_flags(cli.brief, cli.full);

    let ctx = AppContext::new(cli.data_path.clone())?;
    sceneweave::cli::execute(&cli.command, &ctx, mode, detail).await?;

    Ok(())
}
