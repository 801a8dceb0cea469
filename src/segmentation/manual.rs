use crate::models::Segment;
use crate::utils::text::char_chunks;

use super::strategy::{Segmenter, StrategyError, StrategyInput};

/// Exactly `manual_shot_count` contiguous character chunks.
///
/// Chunk lengths are counted in characters, the last chunk absorbs the
/// remainder, and the chunk texts concatenate back to the input exactly.
pub struct ManualSegmenter;

impl Segmenter for ManualSegmenter {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError> {
        let count = input.config.manual_shot_count.max(1);
        let chunks = char_chunks(input.text, count);

        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let duration = input.estimator.estimate(&chunk);
                let mut segment = Segment::new(i, chunk, duration);
                segment
                    .metadata
                    .insert("chunk".into(), format!("{}/{}", i + 1, count));
                segment
            })
            .collect())
    }
}
