pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod models;
pub mod pipeline;
pub mod segmentation;
pub mod services;
pub mod session;
pub mod utils;

pub use error::{Advisory, SceneweaveError};
pub use pipeline::{PipelineReport, ShotPrompt, StoryPipeline};
pub use segmentation::{segment, SegmentationConfig, SegmentationEngine};
