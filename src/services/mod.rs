pub mod continuity;
pub mod enhancer;
pub mod persistence;
pub mod telemetry;
pub mod tone;

pub use continuity::{AdvancePolicy, ContinuityThresholds, ContinuityValidator};
pub use enhancer::{EnhancerConfig, PromptEnhancer};
pub use persistence::{MemorySink, NoopSink, PersistenceSink};
pub use telemetry::TelemetryStore;
pub use tone::{
    create_tone_classifier, tone_distance, CachedToneClassifier, LexiconToneClassifier,
    NeutralToneClassifier, ToneBackend, ToneClassifier, ToneConfig,
};
