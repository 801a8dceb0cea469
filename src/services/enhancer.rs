//! Telemetry-driven prompt enhancement.
//!
//! Enhancement is purely additive: the original prompt is always kept as a
//! prefix and only explicit instructions are appended. Props with a poor
//! manifestation history get called out, and characters carried over from
//! the previous scene are pinned to their earlier appearance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Scene;
use crate::services::telemetry::TelemetryStore;
use crate::utils::sanitize::normalize_token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Rate assumed for tokens with no history (default: 0.8)
    pub default_prior: f64,
    /// Props rendering below this rate get emphasized (default: 0.5)
    pub emphasis_threshold: f64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            default_prior: 0.8,
            emphasis_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptEnhancer {
    config: EnhancerConfig,
}

impl PromptEnhancer {
    pub fn new(config: EnhancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Extend `scene.prompt` with disambiguating instructions.
    pub fn enhance(
        &self,
        scene: &Scene,
        previous: Option<&Scene>,
        telemetry: &TelemetryStore,
    ) -> String {
        let mut result = scene.prompt.clone();

        for prop in &scene.props {
            let rate = telemetry.rate_or(prop, self.config.default_prior);
            if rate < self.config.emphasis_threshold {
                debug!("Emphasizing prop '{}' (rate {:.2})", prop, rate);
                result.push_str(&format!(", CLEARLY SHOWING {}", prop));
            }
        }

        if let Some(previous) = previous {
            for character in &scene.characters {
                let key = normalize_token(character);
                let carried_over = previous
                    .characters
                    .iter()
                    .any(|c| normalize_token(c) == key);
                if carried_over {
                    result.push_str(&format!(
                        ", {} with same appearance as previous scene",
                        character
                    ));
                }
            }
        }

        result
    }
}
