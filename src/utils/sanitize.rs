//! Token normalization for telemetry keys and label comparison.
//!
//! Telemetry is keyed by prop/character names that arrive from several
//! sources (analysis providers, scene lists, feedback callbacks) with
//! inconsistent casing and spacing. Everything is funnelled through
//! [`normalize_token`] before it touches a counter.

use crate::error::SceneweaveError;

/// Canonical form of a token: trimmed, lower-cased, inner whitespace collapsed.
pub fn normalize_token(token: &str) -> String {
    token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a token and reject it if nothing is left.
pub fn validate_token(token: &str) -> Result<String, SceneweaveError> {
    let normalized = normalize_token(token);
    if normalized.is_empty() {
        return Err(SceneweaveError::Validation(format!(
            "Invalid token '{}': must contain at least one non-whitespace character",
            token
        )));
    }
    Ok(normalized)
}

/// Split a comma-separated list from segment metadata, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
