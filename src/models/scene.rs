//! Scene beats and continuity results.
//!
//! A [`Scene`] is one beat of the story as the continuity validator sees it:
//! where it happens, who is on screen, which props are visible, and the prompt
//! text that will be sent for generation. Every comparison between two
//! consecutive scenes yields a [`ValidationOutcome`]; comparisons that found
//! problems are also recorded as immutable [`ContinuityIssue`] entries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One beat of the story.
///
/// Characters and props are kept in ordered sets so issue lists and enhanced
/// prompts come out in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Sequence position within the validation session.
    pub id: u64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub characters: BTreeSet<String>,
    #[serde(default)]
    pub props: BTreeSet<String>,
    #[serde(default)]
    pub prompt: String,
    /// Free-text tone label, e.g. "tense".
    #[serde(default)]
    pub tone: String,
}

impl Scene {
    pub fn new(id: u64, location: impl Into<String>) -> Self {
        Self {
            id,
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_character(mut self, name: impl Into<String>) -> Self {
        self.characters.insert(name.into());
        self
    }

    pub fn with_prop(mut self, prop: impl Into<String>) -> Self {
        self.props.insert(prop.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }
}

/// Logged result of a comparison that found at least one continuity break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuityIssue {
    pub scene_id: u64,
    /// Confidence in `(0, 1]` after all penalties were applied.
    pub confidence: f64,
    /// Human-readable descriptions, in rule order.
    pub issues: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Result of validating one scene against its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// `confidence >= review threshold`
    pub ok: bool,
    pub confidence: f64,
    pub issues: Vec<String>,
    /// Set when the scene should go to a human for review.
    pub ask_human: bool,
}

impl ValidationOutcome {
    /// Outcome for the first scene of a session.
    pub fn bootstrap() -> Self {
        Self {
            ok: true,
            confidence: 1.0,
            issues: Vec::new(),
            ask_human: false,
        }
    }
}
