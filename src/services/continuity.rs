//! Scene-to-scene continuity validation.
//!
//! A [`ContinuityValidator`] owns one session: the scene it last saw and the
//! log of every comparison that found a problem. Each incoming scene is
//! compared against that reference by a fixed sequence of rules, each of
//! which multiplies a running confidence:
//!
//! 1. first scene of the session: confidence 1.0, nothing to compare
//! 2. every prop that disappeared: `× prop_penalty`
//! 3. every character that vanished while the location stayed the same:
//!    `× character_penalty`
//! 4. tone distance above `tone_drift_threshold`: `× tone_penalty`
//!
//! Scenes below `review_threshold` are flagged for human review. Validation
//! never rejects input; empty fields are compared as they are.
//!
//! The validator takes `&mut self`, so a session is single-writer by
//! construction. Hosts that share one across tasks must serialize access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{ContinuityIssue, Scene, ValidationOutcome};
use crate::services::persistence::PersistenceSink;
use crate::services::tone::{tone_distance, ToneClassifier};
use crate::utils::sanitize::normalize_token;

/// When the session reference moves on to the scene just validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Always advance, even past a scene that failed validation.
    #[default]
    Always,
    /// Keep the last passing scene as the reference after a failure.
    OnlyWhenOk,
}

/// Penalty factors and cut lines for the continuity rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityThresholds {
    /// Multiplier per missing prop (default: 0.7)
    pub prop_penalty: f64,
    /// Multiplier per vanished character at an unchanged location (default: 0.5)
    pub character_penalty: f64,
    /// Multiplier for a tone jump (default: 0.6)
    pub tone_penalty: f64,
    /// Tone distance above which the tone rule fires (default: 0.8)
    pub tone_drift_threshold: f64,
    /// Confidence below which a scene goes to human review (default: 0.6)
    pub review_threshold: f64,
    pub advance_policy: AdvancePolicy,
}

impl Default for ContinuityThresholds {
    fn default() -> Self {
        Self {
            prop_penalty: 0.7,
            character_penalty: 0.5,
            tone_penalty: 0.6,
            tone_drift_threshold: 0.8,
            review_threshold: 0.6,
            advance_policy: AdvancePolicy::Always,
        }
    }
}

impl ContinuityThresholds {
    /// Replace penalties outside `(0, 1]` with their defaults.
    ///
    /// Keeps confidence strictly positive and non-increasing.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let valid = |p: f64| p > 0.0 && p <= 1.0;

        if !valid(self.prop_penalty) {
            warn!(
                "prop_penalty {} outside (0, 1], using {}",
                self.prop_penalty, defaults.prop_penalty
            );
            self.prop_penalty = defaults.prop_penalty;
        }
        if !valid(self.character_penalty) {
            warn!(
                "character_penalty {} outside (0, 1], using {}",
                self.character_penalty, defaults.character_penalty
            );
            self.character_penalty = defaults.character_penalty;
        }
        if !valid(self.tone_penalty) {
            warn!(
                "tone_penalty {} outside (0, 1], using {}",
                self.tone_penalty, defaults.tone_penalty
            );
            self.tone_penalty = defaults.tone_penalty;
        }
        if !self.tone_drift_threshold.is_finite() || self.tone_drift_threshold < 0.0 {
            warn!(
                "tone_drift_threshold {} invalid, using {}",
                self.tone_drift_threshold, defaults.tone_drift_threshold
            );
            self.tone_drift_threshold = defaults.tone_drift_threshold;
        }
        if !self.review_threshold.is_finite() {
            self.review_threshold = defaults.review_threshold;
        }
        self
    }
}

/// Stateful continuity checker for one narrative session.
pub struct ContinuityValidator {
    session_id: Uuid,
    tone: Arc<dyn ToneClassifier>,
    thresholds: ContinuityThresholds,
    previous: Option<Scene>,
    log: Vec<ContinuityIssue>,
    sink: Option<Arc<dyn PersistenceSink>>,
}

impl ContinuityValidator {
    pub fn new(tone: Arc<dyn ToneClassifier>) -> Self {
        Self::with_thresholds(tone, ContinuityThresholds::default())
    }

    pub fn with_thresholds(tone: Arc<dyn ToneClassifier>, thresholds: ContinuityThresholds) -> Self {
        let session_id = Uuid::new_v4();
        debug!("Continuity session {} started", session_id);
        Self {
            session_id,
            tone,
            thresholds: thresholds.sanitized(),
            previous: None,
            log: Vec::new(),
            sink: None,
        }
    }

    /// Forward scenes and issues to a persistence collaborator.
    pub fn with_sink(mut self, sink: Arc<dyn PersistenceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn thresholds(&self) -> &ContinuityThresholds {
        &self.thresholds
    }

    /// The current reference scene.
    pub fn previous(&self) -> Option<&Scene> {
        self.previous.as_ref()
    }

    /// Every comparison of this session that found at least one issue.
    pub fn issue_log(&self) -> &[ContinuityIssue] {
        &self.log
    }

    /// Start over: forget the reference scene and clear the log.
    pub fn reset(&mut self) {
        self.previous = None;
        self.log.clear();
        self.session_id = Uuid::new_v4();
    }

    /// Compare `scene` against the reference, then advance the reference.
    pub fn validate(&mut self, scene: Scene) -> ValidationOutcome {
        self.persist_scene(&scene);

        let Some(previous) = self.previous.as_ref() else {
            debug!("Scene {} bootstraps session {}", scene.id, self.session_id);
            self.previous = Some(scene);
            return ValidationOutcome::bootstrap();
        };

        if scene.id <= previous.id {
            warn!(
                "Scene id {} does not follow previous id {} in session {}",
                scene.id, previous.id, self.session_id
            );
        }

        let t = &self.thresholds;
        let mut confidence = 1.0_f64;
        let mut issues = Vec::new();

        let current_props = normalized_set(&scene.props);
        for (key, prop) in normalized_view(&previous.props) {
            if !current_props.contains(&key) {
                confidence *= t.prop_penalty;
                issues.push(format!(
                    "Prop '{}' from scene {} is missing",
                    prop, previous.id
                ));
            }
        }

        if normalize_token(&previous.location) == normalize_token(&scene.location) {
            let current_characters = normalized_set(&scene.characters);
            for (key, character) in normalized_view(&previous.characters) {
                if !current_characters.contains(&key) {
                    confidence *= t.character_penalty;
                    issues.push(format!(
                        "Character '{}' vanished from {} (present in scene {})",
                        character, scene.location, previous.id
                    ));
                }
            }
        }

        let distance = tone_distance(self.tone.as_ref(), &previous.tone, &scene.tone);
        if distance > t.tone_drift_threshold {
            confidence *= t.tone_penalty;
            issues.push(format!(
                "Tone jump from '{}' to '{}' (distance {:.2})",
                previous.tone, scene.tone, distance
            ));
        }

        let confidence = confidence.max(f64::MIN_POSITIVE);
        let ok = confidence >= t.review_threshold;
        let ask_human = !ok;
        debug!(
            "Scene {}: confidence {:.3}, {} issue(s)",
            scene.id,
            confidence,
            issues.len()
        );
        if ask_human {
            info!(
                "Scene {} flagged for review (confidence {:.2}): {}",
                scene.id,
                confidence,
                issues.join("; ")
            );
        }

        let scene_id = scene.id;
        match t.advance_policy {
            AdvancePolicy::Always => self.previous = Some(scene),
            AdvancePolicy::OnlyWhenOk if ok => self.previous = Some(scene),
            AdvancePolicy::OnlyWhenOk => {
                debug!("Keeping scene {} as reference after failure", self.reference_id());
            }
        }

        if !issues.is_empty() {
            let record = ContinuityIssue {
                scene_id,
                confidence,
                issues: issues.clone(),
                recorded_at: Utc::now(),
            };
            self.persist_issue(&record);
            self.log.push(record);
        }

        ValidationOutcome {
            ok,
            confidence,
            issues,
            ask_human,
        }
    }

    fn reference_id(&self) -> u64 {
        self.previous.as_ref().map(|s| s.id).unwrap_or_default()
    }

    fn persist_scene(&self, scene: &Scene) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist_scene(scene) {
                warn!("Failed to persist scene {}: {}", scene.id, e);
            }
        }
    }

    fn persist_issue(&self, issue: &ContinuityIssue) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist_issue(issue) {
                warn!("Failed to persist issue for scene {}: {}", issue.scene_id, e);
            }
        }
    }
}

fn normalized_set(items: &BTreeSet<String>) -> BTreeSet<String> {
    items.iter().map(|s| normalize_token(s)).collect()
}

/// One entry per normalized token, keeping the first spelling seen.
fn normalized_view(items: &BTreeSet<String>) -> BTreeMap<String, &str> {
    let mut view = BTreeMap::new();
    for item in items {
        view.entry(normalize_token(item)).or_insert(item.as_str());
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::persistence::MemorySink;
    use crate::services::tone::{LexiconToneClassifier, NeutralToneClassifier};
    use pretty_assertions::assert_eq;

    fn validator() -> ContinuityValidator {
        ContinuityValidator::new(Arc::new(LexiconToneClassifier::new()))
    }

    fn forest(id: u64) -> Scene {
        Scene::new(id, "Forest").with_tone("mystical")
    }

    #[test]
    fn test_first_scene_bootstraps() {
        let mut v = validator();
        let outcome = v.validate(forest(1).with_prop("wand").with_character("Wizard"));
        assert_eq!(outcome, ValidationOutcome::bootstrap());
        assert_eq!(v.previous().map(|s| s.id), Some(1));
        assert!(v.issue_log().is_empty());
    }

    #[test]
    fn test_missing_prop_penalized() {
        let mut v = validator();
        v.validate(forest(1).with_prop("wand").with_character("Wizard"));
        let outcome = v.validate(forest(2).with_character("Wizard"));

        assert!((outcome.confidence - 0.7).abs() < 1e-9);
        assert!(outcome.ok);
        assert!(!outcome.ask_human);
        assert_eq!(outcome.issues, vec!["Prop 'wand' from scene 1 is missing"]);
        assert_eq!(v.issue_log().len(), 1);
    }

    #[test]
    fn test_prop_match_ignores_case() {
        let mut v = validator();
        v.validate(forest(1).with_prop("Wand"));
        let outcome = v.validate(forest(2).with_prop("wand"));
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn test_case_variants_penalized_once() {
        let mut v = validator();
        v.validate(
            forest(1)
                .with_prop("Wand")
                .with_prop("wand")
                .with_character("Wizard")
                .with_character("WIZARD"),
        );
        let outcome = v.validate(forest(2));
        assert!((outcome.confidence - 0.7 * 0.5).abs() < 1e-9);
        assert_eq!(outcome.issues.len(), 2);
        assert_eq!(outcome.issues[0], "Prop 'Wand' from scene 1 is missing");
    }

    #[test]
    fn test_confidence_never_reaches_zero() {
        let mut v = validator();
        let crowd = (0..1200).fold(forest(1), |scene, i| {
            scene.with_character(format!("Villager {}", i))
        });
        v.validate(crowd);
        let outcome = v.validate(forest(2));
        assert!(outcome.confidence > 0.0);
        assert!(outcome.ask_human);
        assert_eq!(outcome.issues.len(), 1200);
    }

    #[test]
    fn test_vanished_character_same_location() {
        let mut v = validator();
        v.validate(forest(1).with_character("Wizard"));
        let outcome = v.validate(forest(2));
        assert!((outcome.confidence - 0.5).abs() < 1e-9);
        assert!(!outcome.ok);
        assert!(outcome.ask_human);
        assert!(outcome.issues[0].contains("Wizard"));
    }

    #[test]
    fn test_character_may_leave_on_location_change() {
        let mut v = validator();
        v.validate(forest(1).with_character("Wizard"));
        let outcome = v.validate(Scene::new(2, "Castle").with_tone("mystical"));
        assert_eq!(outcome.confidence, 1.0);
        assert!(outcome.issues.is_empty());
        assert!(v.issue_log().is_empty());
    }

    #[test]
    fn test_tone_jump_penalized() {
        let mut v = validator();
        v.validate(Scene::new(1, "Fair").with_tone("joyful"));
        let outcome = v.validate(Scene::new(2, "Fair").with_tone("tense"));
        assert!((outcome.confidence - 0.6).abs() < 1e-9);
        assert!(outcome.ok);
        assert!(outcome.issues[0].starts_with("Tone jump from 'joyful' to 'tense'"));
    }

    #[test]
    fn test_neutral_classifier_disables_tone_rule() {
        let mut v = ContinuityValidator::new(Arc::new(NeutralToneClassifier));
        v.validate(Scene::new(1, "Fair").with_tone("joyful"));
        let outcome = v.validate(Scene::new(2, "Fair").with_tone("horror"));
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn test_rules_compound_in_order() {
        let mut v = validator();
        v.validate(
            Scene::new(1, "Keep")
                .with_prop("torch")
                .with_prop("map")
                .with_character("Knight")
                .with_tone("joyful"),
        );
        let outcome = v.validate(Scene::new(2, "Keep").with_tone("grim"));
        let expected = 0.7 * 0.7 * 0.5 * 0.6;
        assert!((outcome.confidence - expected).abs() < 1e-9);
        assert_eq!(outcome.issues.len(), 4);
        assert!(outcome.issues[0].contains("map"));
        assert!(outcome.issues[1].contains("torch"));
        assert!(outcome.issues[2].contains("Knight"));
        assert!(outcome.issues[3].starts_with("Tone jump"));
    }

    #[test]
    fn test_reference_always_advances_by_default() {
        let mut v = validator();
        v.validate(forest(1).with_character("Wizard"));
        let failed = v.validate(forest(2));
        assert!(!failed.ok);
        assert_eq!(v.previous().map(|s| s.id), Some(2));

        // The broken scene is the new baseline, so nothing vanishes now.
        let outcome = v.validate(forest(3));
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn test_only_when_ok_keeps_reference() {
        let thresholds = ContinuityThresholds {
            advance_policy: AdvancePolicy::OnlyWhenOk,
            ..Default::default()
        };
        let mut v =
            ContinuityValidator::with_thresholds(Arc::new(LexiconToneClassifier::new()), thresholds);
        v.validate(forest(1).with_character("Wizard"));
        assert!(!v.validate(forest(2)).ok);
        assert_eq!(v.previous().map(|s| s.id), Some(1));

        let outcome = v.validate(forest(3).with_character("Wizard"));
        assert_eq!(outcome.confidence, 1.0);
        assert_eq!(v.previous().map(|s| s.id), Some(3));
    }

    #[test]
    fn test_invalid_penalties_replaced() {
        let t = ContinuityThresholds {
            prop_penalty: 1.5,
            character_penalty: 0.0,
            tone_penalty: -1.0,
            tone_drift_threshold: f64::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(t, ContinuityThresholds::default());
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut v = validator();
        let first = v.session_id();
        v.validate(forest(1).with_character("Wizard"));
        v.validate(forest(2));
        v.reset();
        assert!(v.previous().is_none());
        assert!(v.issue_log().is_empty());
        assert_ne!(v.session_id(), first);
        assert_eq!(v.validate(forest(1)), ValidationOutcome::bootstrap());
    }

    #[test]
    fn test_sink_receives_scenes_and_issues() {
        let sink = Arc::new(MemorySink::new());
        let mut v = validator().with_sink(sink.clone());
        v.validate(forest(1).with_prop("wand"));
        v.validate(forest(2));
        assert_eq!(sink.scenes().len(), 2);
        assert_eq!(sink.issues().len(), 1);
        assert_eq!(sink.issues()[0].scene_id, 2);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_scene() -> impl Strategy<Value = (String, Vec<String>, Vec<String>, String)> {
            (
                prop_oneof![Just("Forest".to_string()), Just("Castle".to_string())],
                proptest::collection::vec("[a-d]", 0..4),
                proptest::collection::vec("[A-D]", 0..4),
                prop_oneof![
                    Just("joyful".to_string()),
                    Just("tense".to_string()),
                    Just("mystical".to_string()),
                    Just("horror".to_string())
                ],
            )
        }

        proptest! {
            #[test]
            fn prop_confidence_in_unit_interval(
                scenes in proptest::collection::vec(arb_scene(), 1..12),
            ) {
                let mut v = validator();
                for (i, (location, props, characters, tone)) in scenes.into_iter().enumerate() {
                    let mut scene = Scene::new(i as u64, location).with_tone(tone);
                    scene.props = props.into_iter().collect();
                    scene.characters = characters.into_iter().collect();
                    let outcome = v.validate(scene);
                    prop_assert!(outcome.confidence > 0.0 && outcome.confidence <= 1.0);
                    prop_assert_eq!(outcome.ok, !outcome.ask_human);
                    prop_assert_eq!(outcome.issues.is_empty(), outcome.confidence == 1.0);
                }
            }
        }
    }
}
