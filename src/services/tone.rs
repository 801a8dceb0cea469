//! Tone scoring for continuity checks.
//!
//! A [`ToneClassifier`] maps a short text (usually a tone label such as
//! "tense" or "whimsical") to a scalar in `[-1, 1]`. The validator only ever
//! uses the difference of two scores, see [`tone_distance`].
//!
//! Implementations must be deterministic for a given text so validation
//! results are reproducible.

use std::collections::HashMap;
use std::sync::Arc;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Capability interface for scalar tone scoring.
pub trait ToneClassifier: Send + Sync {
    /// Score `text` in `[-1, 1]`; negative is dark/tense, positive is bright/warm.
    fn score(&self, text: &str) -> f64;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Absolute difference between the scores of two tone labels.
pub fn tone_distance(classifier: &dyn ToneClassifier, a: &str, b: &str) -> f64 {
    (classifier.score(a) - classifier.score(b)).abs()
}

/// Built-in tone vocabulary.
const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("joyful", 0.9),
    ("triumphant", 0.9),
    ("celebratory", 0.9),
    ("happy", 0.8),
    ("cheerful", 0.8),
    ("uplifting", 0.8),
    ("love", 0.8),
    ("loving", 0.8),
    ("playful", 0.7),
    ("romantic", 0.7),
    ("lighthearted", 0.7),
    ("comedic", 0.7),
    ("funny", 0.7),
    ("hopeful", 0.6),
    ("warm", 0.6),
    ("peaceful", 0.6),
    ("whimsical", 0.6),
    ("wondrous", 0.6),
    ("exciting", 0.6),
    ("serene", 0.5),
    ("tender", 0.5),
    ("adventurous", 0.5),
    ("bright", 0.5),
    ("calm", 0.4),
    ("magical", 0.4),
    ("epic", 0.4),
    ("mystical", 0.2),
    ("nostalgic", 0.2),
    ("curious", 0.2),
    ("reflective", 0.1),
    ("quiet", 0.1),
    ("neutral", 0.0),
    ("mysterious", -0.1),
    ("bittersweet", -0.1),
    ("lonely", -0.5),
    ("melancholy", -0.5),
    ("melancholic", -0.5),
    ("suspenseful", -0.5),
    ("chaotic", -0.5),
    ("tense", -0.6),
    ("dark", -0.6),
    ("somber", -0.6),
    ("eerie", -0.6),
    ("anxious", -0.6),
    ("gloomy", -0.6),
    ("ominous", -0.7),
    ("grim", -0.7),
    ("sad", -0.7),
    ("scary", -0.7),
    ("fearful", -0.7),
    ("angry", -0.7),
    ("desperate", -0.7),
    ("bleak", -0.7),
    ("hostile", -0.7),
    ("furious", -0.8),
    ("violent", -0.8),
    ("menacing", -0.8),
    ("sinister", -0.8),
    ("dread", -0.8),
    ("grief", -0.8),
    ("tragic", -0.9),
    ("horrifying", -0.9),
    ("horror", -0.9),
    ("terrifying", -0.9),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "hardly"];

/// Lexicon-based classifier: averages the scores of known tone words.
///
/// A negation directly before a tone word flips its sign. Text with no
/// known words scores 0.0.
#[derive(Debug, Clone)]
pub struct LexiconToneClassifier {
    lexicon: HashMap<String, f64>,
}

impl LexiconToneClassifier {
    pub fn new() -> Self {
        let lexicon = DEFAULT_LEXICON
            .iter()
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        Self { lexicon }
    }

    /// Add or override a lexicon entry. Scores are clamped to `[-1, 1]`.
    pub fn with_entry(mut self, word: &str, score: f64) -> Self {
        self.lexicon
            .insert(word.trim().to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }

    pub fn with_entries<'a>(mut self, entries: impl IntoIterator<Item = (&'a String, &'a f64)>) -> Self {
        for (word, score) in entries {
            self = self.with_entry(word, *score);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }
}

impl Default for LexiconToneClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneClassifier for LexiconToneClassifier {
    fn score(&self, text: &str) -> f64 {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let mut total = 0.0;
        let mut hits = 0usize;
        for (i, word) in words.iter().enumerate() {
            if let Some(score) = self.lexicon.get(word) {
                let negated = i > 0 && NEGATIONS.contains(&words[i - 1].as_str());
                total += if negated { -score } else { *score };
                hits += 1;
            }
        }

        if hits == 0 {
            0.0
        } else {
            (total / hits as f64).clamp(-1.0, 1.0)
        }
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Classifier that scores everything as neutral.
///
/// With this backend the tone-drift rule never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralToneClassifier;

impl ToneClassifier for NeutralToneClassifier {
    fn score(&self, _text: &str) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "neutral"
    }
}

/// Memoizing wrapper for expensive (model-backed) classifiers.
pub struct CachedToneClassifier<C> {
    inner: C,
    cache: Cache<String, f64>,
}

impl<C: ToneClassifier> CachedToneClassifier<C> {
    pub fn new(inner: C, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Number of cached scores (approximate, moka updates counts lazily).
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl<C: ToneClassifier> ToneClassifier for CachedToneClassifier<C> {
    fn score(&self, text: &str) -> f64 {
        self.cache
            .get_with(text.to_string(), || self.inner.score(text).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Which tone backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneBackend {
    #[default]
    Lexicon,
    Neutral,
}

/// Tone classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub backend: ToneBackend,
    /// Score cache size; 0 disables caching.
    pub cache_capacity: u64,
    /// Extra or overriding lexicon entries.
    pub lexicon: HashMap<String, f64>,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            backend: ToneBackend::Lexicon,
            cache_capacity: 1024,
            lexicon: HashMap::new(),
        }
    }
}

/// Build a tone classifier from configuration.
pub fn create_tone_classifier(config: &ToneConfig) -> Arc<dyn ToneClassifier> {
    match config.backend {
        ToneBackend::Neutral => {
            info!("Tone classifier: neutral (tone drift disabled)");
            Arc::new(NeutralToneClassifier)
        }
        ToneBackend::Lexicon => {
            let lexicon = LexiconToneClassifier::new().with_entries(&config.lexicon);
            info!("Tone classifier: lexicon ({} entries)", lexicon.len());
            if config.cache_capacity > 0 {
                debug!("Tone score cache capacity {}", config.cache_capacity);
                Arc::new(CachedToneClassifier::new(lexicon, config.cache_capacity))
            } else {
                Arc::new(lexicon)
            }
        }
    }
}
