use crate::models::Segment;
use crate::utils::text::word_chunks;

use super::strategy::{Segmenter, StrategyError, StrategyInput};

pub const BASIC_CHUNK_COUNT: usize = 5;

/// Five near-equal word chunks. Never fails; empty text yields nothing.
pub struct BasicSegmenter;

impl Segmenter for BasicSegmenter {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError> {
        Ok(word_chunks(input.text, BASIC_CHUNK_COUNT)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let duration = input.estimator.estimate(&chunk);
                Segment::new(i, chunk, duration)
            })
            .collect())
    }
}
