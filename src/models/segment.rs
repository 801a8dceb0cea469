//! Segmentation output units.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Advisory;

/// Narrative function of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Establishing,
    Action,
    Dialogue,
    Transition,
    Montage,
}

impl SceneType {
    /// Parse a free-text scene type label from an external analysis.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "establishing" | "establishing_shot" | "intro" => Some(SceneType::Establishing),
            "action" => Some(SceneType::Action),
            "dialogue" | "dialog" | "conversation" => Some(SceneType::Dialogue),
            "transition" => Some(SceneType::Transition),
            "montage" => Some(SceneType::Montage),
            _ => None,
        }
    }

    /// Default framing for this kind of scene.
    pub fn default_shot(self) -> ShotType {
        match self {
            SceneType::Establishing | SceneType::Transition => ShotType::Wide,
            SceneType::Action | SceneType::Montage => ShotType::Medium,
            SceneType::Dialogue => ShotType::OverTheShoulder,
        }
    }

    pub fn default_pacing(self) -> &'static str {
        match self {
            SceneType::Establishing => "slow",
            SceneType::Action | SceneType::Montage => "fast",
            SceneType::Dialogue | SceneType::Transition => "moderate",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SceneType::Establishing => "establishing",
            SceneType::Action => "action",
            SceneType::Dialogue => "dialogue",
            SceneType::Transition => "transition",
            SceneType::Montage => "montage",
        };
        f.write_str(s)
    }
}

/// Suggested camera framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Wide,
    Medium,
    Closeup,
    ExtremeCloseup,
    OverTheShoulder,
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShotType::Wide => "wide",
            ShotType::Medium => "medium",
            ShotType::Closeup => "closeup",
            ShotType::ExtremeCloseup => "extreme closeup",
            ShotType::OverTheShoulder => "over the shoulder",
        };
        f.write_str(s)
    }
}

/// One duration-bounded unit of text ready for generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based position in the final sequence.
    pub index: usize,
    pub text: String,
    /// Seconds.
    pub estimated_duration: f64,
    pub scene_type: Option<SceneType>,
    pub suggested_shot_type: Option<ShotType>,
    pub pacing: String,
    pub transition_hint: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>, estimated_duration: f64) -> Self {
        Self {
            index,
            text: text.into(),
            estimated_duration,
            scene_type: None,
            suggested_shot_type: None,
            pacing: "moderate".to_string(),
            transition_hint: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Metadata value, if present and non-empty.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Output of one segmentation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    pub segments: Vec<Segment>,
    /// Sum of all segment durations after hard limits were applied.
    pub total_duration: f64,
    /// Name of the strategy that actually produced the segments.
    pub strategy_used: String,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl SegmentationResult {
    /// Whether the requested strategy was replaced by the basic fallback.
    pub fn used_fallback(&self) -> bool {
        self.advisories.iter().any(|a| {
            matches!(
                a,
                Advisory::AnalysisUnavailable | Advisory::StrategyExecutionFailed { .. }
            )
        })
    }
}
