//! CLI interface for sceneweave.

pub mod handlers;
pub mod output;

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::init::AppContext;
use crate::segmentation::{DurationStrategy, SegmentationConfig, SegmentationStrategy};
use output::{DetailLevel, OutputMode};

/// Sceneweave - turn story text into timed, continuity-checked scene prompts
#[derive(Parser)]
#[command(name = "sceneweave", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.sceneweave)
    #[arg(long, env = "SCENEWEAVE_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as Markdown
    #[arg(long, global = true)]
    pub md: bool,

    /// Brief output (less detail)
    #[arg(long, global = true)]
    pub brief: bool,

    /// Full output (maximum detail)
    #[arg(long, global = true)]
    pub full: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Segmentation overrides shared by `segment` and `pipeline`.
#[derive(Args, Debug, Clone, Default)]
pub struct SegmentationArgs {
    /// Strategy: automatic, per_scene, per_beat, manual
    #[arg(long, short = 's', value_parser = parse_strategy)]
    pub strategy: Option<SegmentationStrategy>,

    /// Duration estimation: script_based, fixed
    #[arg(long, value_parser = parse_duration_strategy)]
    pub duration: Option<DurationStrategy>,

    /// Seconds per shot for the fixed duration strategy
    #[arg(long)]
    pub fixed_seconds: Option<f64>,

    /// Maximum number of shots (extra segments are merged)
    #[arg(long)]
    pub max_shots: Option<usize>,

    /// Maximum total duration in seconds (durations are scaled down)
    #[arg(long)]
    pub max_total: Option<f64>,

    /// Minimum seconds per shot
    #[arg(long)]
    pub min_shot: Option<f64>,

    /// Maximum seconds per shot
    #[arg(long)]
    pub max_shot: Option<f64>,

    /// Number of chunks for the manual strategy
    #[arg(long)]
    pub shots: Option<usize>,

    /// Structured analysis (JSON or YAML) for the automatic strategy
    #[arg(long)]
    pub analysis: Option<PathBuf>,
}

impl SegmentationArgs {
    /// Overlay command-line values on the configured defaults.
    pub fn apply(&self, base: &SegmentationConfig) -> SegmentationConfig {
        let mut config = base.clone();
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(duration) = self.duration {
            config.duration_strategy = duration;
        }
        if let Some(seconds) = self.fixed_seconds {
            config.fixed_duration_seconds = seconds;
            if self.duration.is_none() {
                config.duration_strategy = DurationStrategy::Fixed;
            }
        }
        if self.max_shots.is_some() {
            config.max_shots = self.max_shots;
        }
        if self.max_total.is_some() {
            config.max_total_duration = self.max_total;
        }
        if let Some(min) = self.min_shot {
            config.min_shot_duration = min;
        }
        if let Some(max) = self.max_shot {
            config.max_shot_duration = max;
        }
        if let Some(shots) = self.shots {
            config.manual_shot_count = shots;
            if self.strategy.is_none() {
                config.strategy = SegmentationStrategy::Manual;
            }
        }
        config
    }
}

fn parse_strategy(s: &str) -> Result<SegmentationStrategy, String> {
    s.parse()
}

fn parse_duration_strategy(s: &str) -> Result<DurationStrategy, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split story files into timed segments
    Segment {
        /// Story files (reads stdin when omitted)
        files: Vec<PathBuf>,
        #[command(flatten)]
        args: SegmentationArgs,
    },

    /// Segment, validate continuity and build enhanced shot prompts
    Pipeline {
        /// Story file (reads stdin when omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        args: SegmentationArgs,
    },

    /// Validate continuity of a scene list (YAML or JSON)
    Validate {
        /// Scene list file (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Keep the last passing scene as reference after a failure
        #[arg(long)]
        only_advance_on_ok: bool,
    },

    /// Record whether a token appeared in a generated shot
    Feedback {
        /// Prop or character name
        token: String,
        /// The token was missing from the output
        #[arg(long)]
        missing: bool,
    },

    /// Show manifestation statistics
    Telemetry {
        /// Only show this token
        token: Option<String>,
        /// Only show tokens below this manifestation rate
        #[arg(long)]
        below: Option<f64>,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

/// Execute a CLI command.
pub async fn execute(
    cmd: &Commands,
    ctx: &AppContext,
    mode: OutputMode,
    detail: DetailLevel,
) -> anyhow::Result<()> {
    match cmd {
        Commands::Segment { files, args } => {
            handlers::segment::handle_segment(ctx, files, args, mode, detail).await?
        }
        Commands::Pipeline { file, args } => {
            handlers::pipeline::handle_pipeline(ctx, file.as_deref(), args, mode, detail).await?
        }
        Commands::Validate {
            file,
            only_advance_on_ok,
        } => {
            handlers::validate::handle_validate(ctx, file.as_deref(), *only_advance_on_ok, mode)
                .await?
        }
        Commands::Feedback { token, missing } => {
            handlers::telemetry::handle_feedback(ctx, token, !*missing, mode).await?
        }
        Commands::Telemetry { token, below } => {
            handlers::telemetry::handle_list(ctx, token.as_deref(), *below, mode)?
        }
        Commands::Config => handlers::config::handle_show(ctx, mode)?,
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "sceneweave",
                &mut std::io::stdout(),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_segment_flags() {
        let cli = Cli::try_parse_from([
            "sceneweave",
            "segment",
            "a.txt",
            "b.txt",
            "--strategy",
            "per-beat",
            "--max-shots",
            "6",
        ])
        .unwrap();
        match cli.command {
            Commands::Segment { files, args } => {
                assert_eq!(files.len(), 2);
                let config = args.apply(&SegmentationConfig::default());
                assert_eq!(config.strategy, SegmentationStrategy::PerBeat);
                assert_eq!(config.max_shots, Some(6));
            }
            _ => panic!("expected segment command"),
        }
    }

    #[test]
    fn test_shots_flag_implies_manual() {
        let args = SegmentationArgs {
            shots: Some(4),
            fixed_seconds: Some(6.0),
            ..Default::default()
        };
        let config = args.apply(&SegmentationConfig::default());
        assert_eq!(config.strategy, SegmentationStrategy::Manual);
        assert_eq!(config.manual_shot_count, 4);
        assert_eq!(config.duration_strategy, DurationStrategy::Fixed);
        assert_eq!(config.fixed_duration_seconds, 6.0);
    }

    #[test]
    fn test_bad_strategy_rejected() {
        assert!(Cli::try_parse_from(["sceneweave", "segment", "--strategy", "chapters"]).is_err());
    }
}
