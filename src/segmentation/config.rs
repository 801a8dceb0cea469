use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Advisory;

/// How raw text is cut into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// One segment per analyzed scene; basic fallback without analysis.
    #[default]
    Automatic,
    /// One segment per scene heading.
    PerScene,
    /// One segment per narrative beat.
    PerBeat,
    /// Exactly `manual_shot_count` equal character chunks.
    Manual,
}

impl SegmentationStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentationStrategy::Automatic => "automatic",
            SegmentationStrategy::PerScene => "per_scene",
            SegmentationStrategy::PerBeat => "per_beat",
            SegmentationStrategy::Manual => "manual",
        }
    }
}

impl fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "automatic" | "auto" => Ok(SegmentationStrategy::Automatic),
            "per_scene" | "scene" => Ok(SegmentationStrategy::PerScene),
            "per_beat" | "beat" => Ok(SegmentationStrategy::PerBeat),
            "manual" => Ok(SegmentationStrategy::Manual),
            other => Err(format!(
                "Unknown strategy '{}'. Valid: automatic, per_scene, per_beat, manual",
                other
            )),
        }
    }
}

/// How text-only segments get their duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationStrategy {
    /// Screenplay rule of thumb: 250 words per page, one minute per page.
    #[default]
    ScriptBased,
    /// Every segment gets `fixed_duration_seconds`.
    Fixed,
}

impl FromStr for DurationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "script_based" | "script" => Ok(DurationStrategy::ScriptBased),
            "fixed" => Ok(DurationStrategy::Fixed),
            other => Err(format!(
                "Unknown duration strategy '{}'. Valid: script_based, fixed",
                other
            )),
        }
    }
}

pub const DEFAULT_MIN_SHOT_SECONDS: f64 = 3.0;
pub const DEFAULT_MAX_SHOT_SECONDS: f64 = 30.0;
pub const DEFAULT_MANUAL_SHOT_COUNT: usize = 5;
pub const DEFAULT_FIXED_SECONDS: f64 = 5.0;

/// Immutable settings for one segmentation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub strategy: SegmentationStrategy,
    pub duration_strategy: DurationStrategy,
    /// Upper bound on the number of segments; extra segments are merged.
    pub max_shots: Option<usize>,
    /// Upper bound on the summed duration in seconds; durations are scaled down.
    pub max_total_duration: Option<f64>,
    pub min_shot_duration: f64,
    pub max_shot_duration: f64,
    pub manual_shot_count: usize,
    pub fixed_duration_seconds: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            strategy: SegmentationStrategy::Automatic,
            duration_strategy: DurationStrategy::ScriptBased,
            max_shots: None,
            max_total_duration: None,
            min_shot_duration: DEFAULT_MIN_SHOT_SECONDS,
            max_shot_duration: DEFAULT_MAX_SHOT_SECONDS,
            manual_shot_count: DEFAULT_MANUAL_SHOT_COUNT,
            fixed_duration_seconds: DEFAULT_FIXED_SECONDS,
        }
    }
}

impl SegmentationConfig {
    pub fn with_strategy(mut self, strategy: SegmentationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Return a copy with every out-of-range value replaced by its nearest
    /// safe default, plus one advisory per replacement.
    pub fn sanitized(&self) -> (SegmentationConfig, Vec<Advisory>) {
        let mut config = self.clone();
        let mut advisories = Vec::new();

        let bounds_valid = config.min_shot_duration.is_finite()
            && config.max_shot_duration.is_finite()
            && config.min_shot_duration >= 0.0
            && config.max_shot_duration > 0.0;
        if !bounds_valid || config.min_shot_duration > config.max_shot_duration {
            advisories.push(Advisory::config(
                "min_shot_duration/max_shot_duration",
                format!(
                    "[{}, {}] is not a valid range, using [{}, {}]",
                    config.min_shot_duration,
                    config.max_shot_duration,
                    DEFAULT_MIN_SHOT_SECONDS,
                    DEFAULT_MAX_SHOT_SECONDS
                ),
            ));
            config.min_shot_duration = DEFAULT_MIN_SHOT_SECONDS;
            config.max_shot_duration = DEFAULT_MAX_SHOT_SECONDS;
        }

        if config.manual_shot_count == 0 {
            advisories.push(Advisory::config(
                "manual_shot_count",
                "must be positive, using 1",
            ));
            config.manual_shot_count = 1;
        }

        if config.max_shots == Some(0) {
            advisories.push(Advisory::config("max_shots", "must be positive, using 1"));
            config.max_shots = Some(1);
        }

        if let Some(total) = config.max_total_duration {
            if !total.is_finite() || total <= 0.0 {
                advisories.push(Advisory::config(
                    "max_total_duration",
                    format!("{} must be positive, limit ignored", total),
                ));
                config.max_total_duration = None;
            }
        }

        if !config.fixed_duration_seconds.is_finite() || config.fixed_duration_seconds <= 0.0 {
            advisories.push(Advisory::config(
                "fixed_duration_seconds",
                format!(
                    "{} must be positive, using {}",
                    config.fixed_duration_seconds, DEFAULT_FIXED_SECONDS
                ),
            ));
            config.fixed_duration_seconds = DEFAULT_FIXED_SECONDS;
        }

        for advisory in &advisories {
            warn!("{}", advisory);
        }

        (config, advisories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "per-scene".parse::<SegmentationStrategy>(),
            Ok(SegmentationStrategy::PerScene)
        );
        assert_eq!(
            "Beat".parse::<SegmentationStrategy>(),
            Ok(SegmentationStrategy::PerBeat)
        );
        assert!("chapters".parse::<SegmentationStrategy>().is_err());
        assert_eq!("fixed".parse::<DurationStrategy>(), Ok(DurationStrategy::Fixed));
    }

    #[test]
    fn test_default_config_is_clean() {
        let (config, advisories) = SegmentationConfig::default().sanitized();
        assert!(advisories.is_empty());
        assert_eq!(config, SegmentationConfig::default());
    }

    #[test]
    fn test_inverted_bounds_reset() {
        let (config, advisories) = SegmentationConfig {
            min_shot_duration: 40.0,
            max_shot_duration: 10.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(advisories.len(), 1);
        assert_eq!(config.min_shot_duration, 3.0);
        assert_eq!(config.max_shot_duration, 30.0);
    }

    #[test]
    fn test_non_positive_counts() {
        let (config, advisories) = SegmentationConfig {
            manual_shot_count: 0,
            max_shots: Some(0),
            max_total_duration: Some(-5.0),
            fixed_duration_seconds: 0.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(advisories.len(), 4);
        assert_eq!(config.manual_shot_count, 1);
        assert_eq!(config.max_shots, Some(1));
        assert_eq!(config.max_total_duration, None);
        assert_eq!(config.fixed_duration_seconds, 5.0);
    }

    #[test]
    fn test_config_from_toml_uses_defaults() {
        let config: SegmentationConfig = toml::from_str(
            r#"
            strategy = "per_beat"
            max_shots = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, SegmentationStrategy::PerBeat);
        assert_eq!(config.max_shots, Some(8));
        assert_eq!(config.min_shot_duration, 3.0);
        assert_eq!(config.duration_strategy, DurationStrategy::ScriptBased);
    }
}
