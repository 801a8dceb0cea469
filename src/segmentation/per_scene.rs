//! One segment per scene heading.
//!
//! Recognized headings, each at the start of a line:
//! - screenplay sluglines: `INT. KITCHEN - NIGHT`, `EXT./INT. CAR - DAY`, `I/E ...`
//! - `Scene 12: The Ruins`, `Chapter Three`
//! - markdown headings: `## The Ruins`
//!
//! Text before the first heading is prepended to the first segment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SceneType, Segment, ShotType};

use super::classify::{infer_pacing, infer_scene_type};
use super::strategy::{Segmenter, StrategyError, StrategyInput};

static SCENE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:INT\.?/EXT|EXT\.?/INT|I/E|INT|EXT|EST)[. \t]|(?i:scene)[ \t]+\d+\b|(?i:chapter)[ \t]+\S|#{1,6}[ \t]+\S).*$",
    )
    .expect("Valid scene heading regex")
});

static SLUG_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:INT\.?/EXT|EXT\.?/INT|I/E|INT|EXT|EST)\.?\s*")
        .expect("Valid slugline prefix regex")
});

static NUMBERED_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:scene|chapter)\s+\S+\s*[:.\-]?\s*").expect("Valid numbered heading regex")
});

const TIMES_OF_DAY: &[&str] = &[
    "DAY",
    "NIGHT",
    "MORNING",
    "AFTERNOON",
    "EVENING",
    "DAWN",
    "DUSK",
    "SUNRISE",
    "SUNSET",
    "MIDNIGHT",
    "LATER",
    "CONTINUOUS",
    "MOMENTS LATER",
];

/// Location and time of day parsed from one heading line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneHeading {
    pub raw: String,
    pub location: String,
    pub time_of_day: String,
    pub setting: Option<&'static str>,
}

/// Parse a heading line into its parts.
pub fn parse_heading(line: &str) -> SceneHeading {
    let raw = line.trim().to_string();
    let mut rest = raw.as_str();
    let mut setting = None;

    if let Some(m) = SLUG_PREFIX.find(rest) {
        let prefix = m.as_str().trim().trim_end_matches('.');
        setting = Some(match prefix {
            "INT" => "interior",
            "EXT" => "exterior",
            "EST" => "establishing",
            _ => "interior/exterior",
        });
        rest = &rest[m.end()..];
    } else if rest.starts_with('#') {
        rest = rest.trim_start_matches('#').trim_start();
    } else if let Some(m) = NUMBERED_PREFIX.find(rest) {
        rest = &rest[m.end()..];
    }

    let parts: Vec<&str> = rest
        .split(" - ")
        .flat_map(|p| p.split(" \u{2013} "))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let (location, time_of_day) = match parts.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [head @ .., last] if TIMES_OF_DAY.contains(&last.to_uppercase().as_str()) => {
            (head.join(" - "), last.to_string())
        }
        all => (all.join(" - "), String::new()),
    };

    SceneHeading {
        raw,
        location,
        time_of_day,
        setting,
    }
}

/// All-caps short lines inside a scene body are character cues.
fn character_cues(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in body.lines() {
        let cue = line.trim();
        let name = cue.split('(').next().unwrap_or("").trim();
        let words = name.split_whitespace().count();
        let is_cue = (1..=3).contains(&words)
            && name.chars().any(|c| c.is_alphabetic())
            && name
                .chars()
                .all(|c| c.is_uppercase() || c.is_whitespace() || c == '.' || c == '\'')
            && !SCENE_HEADING.is_match(cue)
            && !matches!(name, "CUT TO" | "FADE IN" | "FADE OUT" | "THE END");
        if is_cue {
            let title = name
                .split_whitespace()
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            if !names.contains(&title) {
                names.push(title);
            }
        }
    }
    names
}

pub struct PerSceneSegmenter;

impl Segmenter for PerSceneSegmenter {
    fn name(&self) -> &'static str {
        "per_scene"
    }

    fn segment(&self, input: &StrategyInput<'_>) -> Result<Vec<Segment>, StrategyError> {
        let text = input.text;
        let starts: Vec<usize> = SCENE_HEADING.find_iter(text).map(|m| m.start()).collect();
        if starts.is_empty() {
            return Err(StrategyError::NoSceneHeadings);
        }

        let preamble = text[..starts[0]].trim();
        let mut segments = Vec::with_capacity(starts.len());
        let mut previous: Option<SceneHeading> = None;

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            let block = text[start..end].trim();
            let (heading_line, body) = block.split_once('\n').unwrap_or((block, ""));
            let heading = parse_heading(heading_line);

            let segment_text = if i == 0 && !preamble.is_empty() {
                format!("{}\n\n{}", preamble, block)
            } else {
                block.to_string()
            };

            let scene_type =
                infer_scene_type(body, i).or((i == 0).then_some(SceneType::Establishing));
            let mut segment = Segment::new(i, segment_text, 0.0);
            segment.estimated_duration = input.estimator.estimate(&segment.text);
            segment.scene_type = scene_type;
            segment.suggested_shot_type = Some(match (scene_type, heading.setting) {
                (Some(t), _) => t.default_shot(),
                (None, Some("exterior")) => ShotType::Wide,
                (None, _) => ShotType::Medium,
            });
            segment.pacing = infer_pacing(body, scene_type);
            segment.transition_hint = Some(transition_between(previous.as_ref(), &heading));

            segment.metadata.insert("heading".into(), heading.raw.clone());
            segment
                .metadata
                .insert("location".into(), heading.location.clone());
            if !heading.time_of_day.is_empty() {
                segment
                    .metadata
                    .insert("time_of_day".into(), heading.time_of_day.clone());
            }
            if let Some(setting) = heading.setting {
                segment.metadata.insert("setting".into(), setting.into());
            }
            let cues = character_cues(body);
            if !cues.is_empty() {
                segment.metadata.insert("characters".into(), cues.join(", "));
            }

            segments.push(segment);
            previous = Some(heading);
        }

        Ok(segments)
    }
}

fn transition_between(previous: Option<&SceneHeading>, current: &SceneHeading) -> String {
    match previous {
        None => "fade in".to_string(),
        Some(prev) if !current.location.is_empty() && prev.location != current.location => {
            format!("cut to {}", current.location)
        }
        Some(prev) if prev.time_of_day != current.time_of_day => "dissolve".to_string(),
        Some(_) => "cut".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::config::SegmentationConfig;
    use crate::segmentation::duration::{script_duration, DurationEstimator};
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> Result<Vec<Segment>, StrategyError> {
        let config = SegmentationConfig::default();
        PerSceneSegmenter.segment(&StrategyInput {
            text,
            analysis: None,
            config: &config,
            estimator: DurationEstimator::from_config(&config),
        })
    }

    const SCRIPT: &str = "Cold open narration.\n\nINT. KITCHEN - NIGHT\nMARA pours coffee.\n\nMARA\nYou're late.\n\nEXT. HARBOR - DAWN\nShips creak in the fog.\n\nEXT. HARBOR - DAY\nThe fog has lifted.\n";

    #[test]
    fn test_parse_slugline() {
        let h = parse_heading("INT. KITCHEN - NIGHT");
        assert_eq!(h.location, "KITCHEN");
        assert_eq!(h.time_of_day, "NIGHT");
        assert_eq!(h.setting, Some("interior"));

        let h = parse_heading("EXT./INT. POLICE CAR - MOVING - DAY");
        assert_eq!(h.location, "POLICE CAR - MOVING");
        assert_eq!(h.setting, Some("interior/exterior"));
    }

    #[test]
    fn test_parse_other_headings() {
        assert_eq!(parse_heading("## The Ruins").location, "The Ruins");
        assert_eq!(parse_heading("Scene 12: The Ruins").location, "The Ruins");
        assert_eq!(parse_heading("Chapter Three").location, "");
    }

    #[test]
    fn test_segments_per_heading() {
        let segments = run(SCRIPT).unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments[0].text.starts_with("Cold open narration."));
        assert!(segments[0].text.contains("INT. KITCHEN - NIGHT"));
        assert_eq!(segments[0].meta("location"), Some("KITCHEN"));
        assert_eq!(segments[0].meta("characters"), Some("Mara"));
        assert_eq!(segments[0].transition_hint.as_deref(), Some("fade in"));
        assert_eq!(segments[0].scene_type, Some(SceneType::Establishing));

        assert_eq!(
            segments[1].transition_hint.as_deref(),
            Some("cut to HARBOR")
        );
        assert_eq!(segments[2].transition_hint.as_deref(), Some("dissolve"));
        assert_eq!(segments[2].meta("time_of_day"), Some("DAY"));
    }

    #[test]
    fn test_preamble_counts_toward_first_duration() {
        let text = format!(
            "{}\n\nINT. CASTLE - NIGHT\nThe guard waits.",
            vec!["prologue"; 100].join(" ")
        );
        let segments = run(&text).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].estimated_duration, script_duration(107));
        assert!(segments[0].estimated_duration > 25.0);
    }

    #[test]
    fn test_durations_within_estimator_bounds() {
        for s in run(SCRIPT).unwrap() {
            assert!((3.0..=30.0).contains(&s.estimated_duration));
        }
    }

    #[test]
    fn test_no_headings_fails() {
        assert_eq!(
            run("Just prose with no headings.\nAnother line."),
            Err(StrategyError::NoSceneHeadings)
        );
    }

    #[test]
    fn test_lowercase_int_is_not_heading() {
        assert_eq!(
            run("interesting times.\nint is a type"),
            Err(StrategyError::NoSceneHeadings)
        );
    }
}
