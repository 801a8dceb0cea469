//! One segment per narrative beat.
//!
//! A new beat starts at every paragraph break, at every sentence that opens
//! with a shift marker ("Suddenly", "Meanwhile", "Hours later", ...), and
//! whenever the running beat grows past [`MAX_BEAT_WORDS`]. The trigger that
//! opened a beat decides its transition hint.

use crate::models::Segment;
use crate::utils::text::{split_paragraphs, split_sentences, word_count};

use super::classify::{infer_pacing, infer_scene_type, suggest_shot};
use super::strategy::{Segmenter, StrategyError, StrategyInput};

pub const MAX_BEAT_WORDS: usize = 80;

/// Shift markers and the transition each one implies.
const SHIFT_MARKERS: &[(&str, &str)] = &[
    ("without warning", "smash cut"),
    ("all at once", "smash cut"),
    ("just then", "smash cut"),
    ("suddenly", "smash cut"),
    ("meanwhile", "cross-cut"),
    ("elsewhere", "cross-cut"),
    ("back at", "cross-cut"),
    ("moments later", "dissolve"),
    ("hours later", "dissolve"),
    ("days later", "dissolve"),
    ("years later", "dissolve"),
    ("the next day", "dissolve"),
    ("the next morning", "dissolve"),
    ("that night", "dissolve"),
    ("later", "dissolve"),
    ("finally", "cut"),
    ("at last", "cut"),
    ("then", "cut"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum BeatTrigger {
    Opening,
    Paragraph,
    Shift(&'static str, &'static str),
    Length,
}

impl BeatTrigger {
    fn label(&self) -> String {
        match self {
            BeatTrigger::Opening => "opening".to_string(),
            BeatTrigger::Paragraph => "paragraph".to_string(),
            BeatTrigger::Shift(marker, _) => format!("shift:{}", marker),
            BeatTrigger::Length => "length".to_string(),
        }
    }

    fn transition(&self) -> &'static str {
        match self {
            BeatTrigger::Opening => "fade in",
            BeatTrigger::Paragraph => "cut",
            BeatTrigger::Shift(_, transition) => transition,
            BeatTrigger::Length => "continuous",
        }
    }
}

#[derive(Debug)]
struct Beat {
    sentences: Vec<String>,
    trigger: BeatTrigger,
}

impl Beat {
    fn new(trigger: BeatTrigger) -> Self {
        Self {
            sentences: Vec::new(),
            trigger,
        }
    }

    fn words(&self) -> usize {
        self.sentences.iter().map(|s| word_count(s)).sum()
    }

    fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

fn shift_marker(sentence: &str) -> Option<(&'static str, &'static str)> {
    let lower = sentence
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    SHIFT_MARKERS.iter().copied().find(|(marker, _)| {
        lower.starts_with(marker)
            && lower[marker.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn detect_beats(text: &str) -> Vec<Beat> {
    let mut beats: Vec<Beat> = Vec::new();

    for paragraph in split_paragraphs(text) {
        let mut current = Beat::new(if beats.is_empty() {
            BeatTrigger::Opening
        } else {
            BeatTrigger::Paragraph
        });

        for sentence in split_sentences(&paragraph) {
            let shift = shift_marker(&sentence);
            let next_trigger = match shift {
                Some((marker, transition)) => Some(BeatTrigger::Shift(marker, transition)),
                None if current.words() + word_count(&sentence) > MAX_BEAT_WORDS => {
                    Some(BeatTrigger::Length)
                }
                None => None,
            };

            if let Some(trigger) = next_trigger {
                if !current.sentences.is_empty() {
                    let finished = std::mem::replace(&mut current, Beat::new(trigger));
                    beats.push(finished);
                } else if current.trigger != BeatTrigger::Opening {
                    current.trigger = trigger;
                }
            }
            current.sentences.push(sentence);
        }

        if !current.sentences.is_empty() {
            beats.push(current);
        }
    }

    beats
}

pub struct PerBeatSegmenter;

impl Segmenter for PerBeatSegmenter {
    fn name(&self) -> &'static str {
        "per_beat"
    }

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError> {
        let beats = detect_beats(input.text);
        if beats.is_empty() {
            return Err(StrategyError::NoBeats);
        }

        let segments = beats
            .iter()
            .enumerate()
            .map(|(i, beat)| {
                let text = beat.text();
                let scene_type = infer_scene_type(&text, i);
                let mut segment = Segment::new(i, text.clone(), input.estimator.estimate(&text));
                segment.scene_type = scene_type;
                segment.suggested_shot_type = Some(suggest_shot(&text, scene_type));
                segment.pacing = infer_pacing(&text, scene_type);
                segment.transition_hint = Some(beat.trigger.transition().to_string());
                segment
                    .metadata
                    .insert("beat_trigger".into(), beat.trigger.label());
                segment
                    .metadata
                    .insert("sentences".into(), beat.sentences.len().to_string());
                segment
            })
            .collect();

        Ok(segments)
    }
}
