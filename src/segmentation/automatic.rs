//! One segment per scene of an external structured analysis.

use crate::models::{AnalyzedScene, SceneType, Segment, ShotType};

use super::duration::analysis_duration;
use super::strategy::{Segmenter, StrategyError, StrategyInput};

pub struct AutomaticSegmenter;

fn scene_text(scene: &AnalyzedScene) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(scene.dialogue.len() + 1);
    if !scene.description.trim().is_empty() {
        parts.push(scene.description.trim());
    }
    parts.extend(
        scene
            .dialogue
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty()),
    );
    parts.join("\n")
}

fn shot_for(scene: &AnalyzedScene, scene_type: Option<SceneType>) -> ShotType {
    if scene.characters.len() == 1 && !scene.dialogue.is_empty() {
        return ShotType::Closeup;
    }
    scene_type.map_or(ShotType::Medium, SceneType::default_shot)
}

fn transition_for(previous: Option<&AnalyzedScene>, scene: &AnalyzedScene) -> String {
    let Some(prev) = previous else {
        return "fade in".to_string();
    };
    let location = scene.location.trim();
    if !location.is_empty() && !prev.location.trim().eq_ignore_ascii_case(location) {
        return format!("cut to {}", location);
    }
    let time = scene.time_of_day.trim();
    if !time.is_empty() && !prev.time_of_day.trim().eq_ignore_ascii_case(time) {
        return format!("dissolve to {}", time);
    }
    "cut".to_string()
}

impl Segmenter for AutomaticSegmenter {
    fn name(&self) -> &'static str {
        "automatic"
    }

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError> {
        let analysis = input.analysis.ok_or(StrategyError::MissingAnalysis)?;

        let mut segments = Vec::with_capacity(analysis.scenes.len());
        let mut previous: Option<&AnalyzedScene> = None;

        for (i, scene) in analysis.scenes.iter().enumerate() {
            let scene_type = SceneType::from_label(&scene.scene_type);
            let mut segment = Segment::new(i, scene_text(scene), analysis_duration(scene));
            segment.scene_type = scene_type;
            segment.suggested_shot_type = Some(shot_for(scene, scene_type));
            segment.pacing = scene_type
                .map_or("moderate", SceneType::default_pacing)
                .to_string();
            segment.transition_hint = Some(transition_for(previous, scene));

            let fields = [
                ("location", scene.location.trim().to_string()),
                ("time_of_day", scene.time_of_day.trim().to_string()),
                ("characters", scene.characters.join(", ")),
                ("emotional_tone", scene.emotional_tone.trim().to_string()),
                ("props", scene.props.join(", ")),
                ("description", scene.description.trim().to_string()),
            ];
            for (key, value) in fields {
                if !value.is_empty() {
                    segment.metadata.insert(key.to_string(), value);
                }
            }

            segments.push(segment);
            previous = Some(scene);
        }

        if segments.is_empty() {
            return Err(StrategyError::EmptyOutput);
        }
        Ok(segments)
    }
}
