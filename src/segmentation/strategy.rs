use thiserror::Error;

use crate::models::{Segment, StructuredAnalysis};

use super::config::SegmentationConfig;
use super::duration::DurationEstimator;

/// Internal failure of a segmentation strategy.
///
/// Never reaches callers: the engine turns it into the basic fallback and a
/// `StrategyExecutionFailed` advisory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("no scene headings found")]
    NoSceneHeadings,

    #[error("no narrative beats found")]
    NoBeats,

    #[error("structured analysis required")]
    MissingAnalysis,

    #[error("strategy produced no segments")]
    EmptyOutput,
}

/// Inputs shared by every strategy for one call.
pub struct StrategyInput<'a> {
    pub text: &'a str,
    pub analysis: Option<&'a StructuredAnalysis>,
    pub config: &'a SegmentationConfig,
    pub estimator: DurationEstimator,
}

/// One way of cutting a story into segments.
///
/// Implementations are stateless; indices they assign are provisional and
/// get rewritten after hard limits are applied.
pub trait Segmenter: Send + Sync {
    fn name(&self) -> &'static str;

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError>;
}
