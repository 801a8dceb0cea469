use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom error type for sceneweave operations.
#[derive(Debug, Error)]
pub enum SceneweaveError {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Input document (story, analysis, scene list) could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence collaborator rejected a record.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<std::io::Error> for SceneweaveError {
    fn from(err: std::io::Error) -> Self {
        SceneweaveError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SceneweaveError {
    fn from(err: serde_json::Error) -> Self {
        SceneweaveError::Parse {
            message: format!("JSON: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml_ng::Error> for SceneweaveError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SceneweaveError::Parse {
            message: format!("YAML: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for SceneweaveError {
    fn from(err: toml::de::Error) -> Self {
        SceneweaveError::Config(err.to_string())
    }
}

/// Non-fatal outcome surfaced alongside results.
///
/// None of these abort processing: the engine always returns usable output
/// and attaches the advisories that explain any degradation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A configuration value was out of range and replaced.
    #[error("Invalid configuration: {field} ({detail})")]
    ConfigurationInvalid { field: String, detail: String },

    /// Input text was empty or whitespace only.
    #[error("Input text is empty")]
    EmptyText,

    /// Automatic segmentation had no structured analysis to work from.
    #[error("Structured analysis unavailable, using basic segmentation")]
    AnalysisUnavailable,

    /// The selected strategy failed and the basic fallback was used instead.
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyExecutionFailed { strategy: String, reason: String },
}

impl Advisory {
    pub(crate) fn config(field: &str, detail: impl Into<String>) -> Self {
        Advisory::ConfigurationInvalid {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_display() {
        let a = Advisory::config("max_shots", "must be positive, using 1");
        assert_eq!(
            a.to_string(),
            "Invalid configuration: max_shots (must be positive, using 1)"
        );
        let b = Advisory::StrategyExecutionFailed {
            strategy: "per_scene".into(),
            reason: "no scene headings".into(),
        };
        assert!(b.to_string().contains("per_scene"));
    }

    #[test]
    fn test_advisory_serializes_tagged() {
        let json = serde_json::to_value(Advisory::EmptyText).unwrap();
        assert_eq!(json["kind"], "empty_text");
    }

    #[test]
    fn test_json_error_converts_to_parse() {
        let err: SceneweaveError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SceneweaveError::Parse { .. }));
    }
}
