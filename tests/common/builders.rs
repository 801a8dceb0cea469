//! Test data builders for scenes, analyses and story text.
//!
//! Provides fluent API for creating test inputs with sensible defaults.

use sceneweave::models::{AnalyzedScene, Scene, StructuredAnalysis};

/// Builder for validator scenes.
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    /// Create a new scene builder at the given location.
    pub fn new(id: u64, location: impl Into<String>) -> Self {
        Self {
            scene: Scene::new(id, location),
        }
    }

    pub fn character(mut self, name: &str) -> Self {
        self.scene.characters.insert(name.to_string());
        self
    }

    pub fn prop(mut self, prop: &str) -> Self {
        self.scene.props.insert(prop.to_string());
        self
    }

    pub fn tone(mut self, tone: &str) -> Self {
        self.scene.tone = tone.to_string();
        self
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.scene.prompt = prompt.to_string();
        self
    }

    pub fn build(self) -> Scene {
        self.scene
    }
}

/// Builder for structured analyses, one scene at a time.
#[derive(Default)]
pub struct AnalysisBuilder {
    scenes: Vec<AnalyzedScene>,
}

impl AnalysisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene with a description, location and type label.
    pub fn scene(mut self, description: &str, location: &str, scene_type: &str) -> Self {
        self.scenes.push(AnalyzedScene {
            description: description.to_string(),
            location: location.to_string(),
            scene_type: scene_type.to_string(),
            ..Default::default()
        });
        self
    }

    /// Modify the most recently added scene.
    pub fn with(mut self, f: impl FnOnce(&mut AnalyzedScene)) -> Self {
        if let Some(last) = self.scenes.last_mut() {
            f(last);
        }
        self
    }

    pub fn build(self) -> StructuredAnalysis {
        StructuredAnalysis {
            scenes: self.scenes,
        }
    }
}

/// A story of exactly `words` distinct words.
pub fn story_of_words(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A short screenplay with three sluglines.
pub const SCREENPLAY: &str = "\
INT. LIGHTHOUSE - NIGHT
The keeper trims the wick. The lamp sputters.

KEEPER
Not tonight. Not again.

EXT. CLIFFS - NIGHT
Waves smash against the rocks. A figure climbs.

EXT. CLIFFS - DAWN
The figure is gone. Only a lantern remains on the ledge.
";

/// Prose with paragraph breaks and shift markers.
pub const PROSE: &str = "\
The village slept beneath a blanket of snow. Smoke rose from a single chimney.

Anna crossed the square with her basket. Suddenly, a bell rang out from the tower! She froze.

Meanwhile, in the castle, the old king counted his coins by candlelight.

Hours later, the snow had buried every footprint.";
