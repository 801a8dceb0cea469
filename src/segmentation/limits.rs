//! Hard limits applied after a strategy has run.
//!
//! Order is fixed: merge down to `max_shots`, scale to `max_total_duration`,
//! clamp each shot into `[min_shot_duration, max_shot_duration]`, reindex.
//! The final clamp can push the total back over `max_total_duration`; that
//! is left as is.

use tracing::debug;

use crate::models::Segment;

use super::config::SegmentationConfig;

/// Apply every hard limit in order and return the final sequence.
pub fn apply_limits(segments: Vec<Segment>, config: &SegmentationConfig) -> Vec<Segment> {
    let mut segments = match config.max_shots {
        Some(max) if segments.len() > max => merge_to(segments, max),
        _ => segments,
    };

    if let Some(max_total) = config.max_total_duration {
        scale_to_total(&mut segments, max_total);
    }

    clamp_durations(&mut segments, config.min_shot_duration, config.max_shot_duration);

    for (i, segment) in segments.iter_mut().enumerate() {
        segment.index = i;
    }
    segments
}

/// Merge adjacent segments into exactly `max` groups of near-equal size.
///
/// The first `len % max` groups take one extra segment, so no group is
/// larger than `ceil(len / max)`.
pub fn merge_to(segments: Vec<Segment>, max: usize) -> Vec<Segment> {
    let max = max.max(1);
    let total = segments.len();
    if total <= max {
        return segments;
    }

    let base = total / max;
    let extra = total % max;
    debug!(from = total, to = max, "Merging segments to respect max_shots");

    let mut source = segments.into_iter();
    let mut merged = Vec::with_capacity(max);
    for group in 0..max {
        let size = base + usize::from(group < extra);
        let parts: Vec<Segment> = source.by_ref().take(size).collect();
        if let Some(segment) = merge_group(parts) {
            merged.push(segment);
        }
    }
    merged
}

fn merge_group(parts: Vec<Segment>) -> Option<Segment> {
    let count = parts.len();
    let mut parts = parts.into_iter();
    let mut head = parts.next()?;

    for part in parts {
        if head.text.is_empty() {
            head.text = part.text;
        } else if !part.text.is_empty() {
            head.text.push(' ');
            head.text.push_str(&part.text);
        }
        head.estimated_duration += part.estimated_duration;
        for (key, value) in part.metadata {
            head.metadata.entry(key).or_insert(value);
        }
    }

    if count > 1 {
        head.metadata
            .insert("merged_segments".into(), count.to_string());
    }
    Some(head)
}

/// Scale every duration by `max_total / total` when the total exceeds it.
pub fn scale_to_total(segments: &mut [Segment], max_total: f64) {
    let total: f64 = segments.iter().map(|s| s.estimated_duration).sum();
    if total <= max_total || total <= 0.0 {
        return;
    }
    let factor = max_total / total;
    debug!(total, max_total, factor, "Scaling segment durations");
    for segment in segments.iter_mut() {
        segment.estimated_duration *= factor;
    }
}

pub fn clamp_durations(segments: &mut [Segment], min: f64, max: f64) {
    for segment in segments.iter_mut() {
        segment.estimated_duration = segment.estimated_duration.clamp(min, max);
    }
}
