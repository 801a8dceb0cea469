//! Structured story analysis supplied by an external provider.
//!
//! Scene extraction itself happens outside this crate. When a host has an
//! analysis it passes it to the segmentation engine; when it does not, the
//! engine falls back to text-only segmentation.

use serde::{Deserialize, Serialize};

/// Per-scene breakdown of a story.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    #[serde(default)]
    pub scenes: Vec<AnalyzedScene>,
}

impl StructuredAnalysis {
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// One scene as described by the analysis provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedScene {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub time_of_day: String,
    /// Free-text scene type, e.g. "action" or "dialogue".
    #[serde(default, rename = "type")]
    pub scene_type: String,
    #[serde(default)]
    pub dialogue: Vec<String>,
    #[serde(default)]
    pub emotional_tone: String,
    /// Visible props, when the provider reports them.
    #[serde(default)]
    pub props: Vec<String>,
}
