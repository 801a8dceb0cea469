//! Lightweight text heuristics for scene type, framing and pacing.

use crate::models::{SceneType, ShotType};
use crate::utils::text::{quoted_word_count, split_sentences, word_count};

const ACTION_WORDS: &[&str] = &[
    "run", "runs", "ran", "sprint", "sprints", "chase", "chases", "chased", "fight", "fights",
    "fought", "punch", "punches", "kick", "kicks", "explodes", "explosion", "crash", "crashes",
    "grab", "grabs", "grabbed", "leap", "leaps", "jump", "jumps", "attack", "attacks", "shoot",
    "shoots", "fires", "dodge", "dodges", "strike", "strikes", "slams", "smash", "smashes",
    "races", "charges", "flees", "battle", "swings", "lunges", "collapses",
];

const MONTAGE_MARKERS: &[&str] = &["montage", "series of shots", "intercut", "time passes"];

const TRANSITION_OPENERS: &[&str] = &["later", "meanwhile", "cut to", "fade", "dissolve", "elsewhere"];

const INTIMATE_WORDS: &[&str] = &[
    "eyes", "tear", "tears", "whisper", "whispers", "whispered", "trembling", "lips", "heartbeat",
    "fingers", "breath",
];

fn lowercase_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn count_hits(words: &[String], vocabulary: &[&str]) -> usize {
    words
        .iter()
        .filter(|w| vocabulary.contains(&w.as_str()))
        .count()
}

/// Guess the narrative function of a passage.
///
/// `position` is the passage's index in the story; the opening passage
/// defaults to establishing when nothing else matches.
pub fn infer_scene_type(text: &str, position: usize) -> Option<SceneType> {
    let total = word_count(text);
    if total == 0 {
        return None;
    }
    let lower = text.to_lowercase();
    let words = lowercase_words(text);

    if MONTAGE_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(SceneType::Montage);
    }

    if quoted_word_count(text) as f64 / total as f64 >= 0.35 {
        return Some(SceneType::Dialogue);
    }

    let action_hits = count_hits(&words, ACTION_WORDS);
    if action_hits >= 2 || (action_hits == 1 && total < 40) {
        return Some(SceneType::Action);
    }

    let opener = lower.trim_start();
    if total < 25 && TRANSITION_OPENERS.iter().any(|t| opener.starts_with(t)) {
        return Some(SceneType::Transition);
    }

    if position == 0 {
        return Some(SceneType::Establishing);
    }

    None
}

/// Framing for a single beat.
///
/// Short passages with intimate detail go extreme closeup, exclamations and
/// short dialogue go closeup, otherwise the scene type's default applies.
pub fn suggest_shot(text: &str, scene_type: Option<SceneType>) -> ShotType {
    let total = word_count(text);
    let words = lowercase_words(text);

    if total > 0 && total < 25 && count_hits(&words, INTIMATE_WORDS) > 0 {
        return ShotType::ExtremeCloseup;
    }
    if text.contains('!') && scene_type != Some(SceneType::Establishing) {
        return ShotType::Closeup;
    }
    match scene_type {
        Some(SceneType::Dialogue) if total < 30 => ShotType::Closeup,
        Some(t) => t.default_shot(),
        None => ShotType::Medium,
    }
}

/// Pacing label from punctuation and sentence length.
pub fn infer_pacing(text: &str, scene_type: Option<SceneType>) -> String {
    let sentences = split_sentences(text);
    let exclamations = text.matches('!').count();

    if exclamations > 0 || scene_type == Some(SceneType::Action) {
        return "fast".to_string();
    }
    if !sentences.is_empty() {
        let avg = word_count(text) as f64 / sentences.len() as f64;
        if avg > 20.0 {
            return "slow".to_string();
        }
    }
    match scene_type {
        Some(t) => t.default_pacing().to_string(),
        None => "moderate".to_string(),
    }
}
