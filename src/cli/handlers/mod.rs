//! CLI command handlers.

pub mod config;
pub mod pipeline;
pub mod segment;
pub mod telemetry;
pub mod validate;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::models::StructuredAnalysis;

/// Read a file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file '{}'", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse JSON for `.json` files, YAML for everything else.
pub(crate) fn parse_document<T: DeserializeOwned>(contents: &str, path: Option<&Path>) -> Result<T> {
    let is_json = path
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(contents).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
    } else {
        serde_yaml_ng::from_str(contents).map_err(|e| anyhow::anyhow!("Invalid YAML: {}", e))
    }
}

pub(crate) fn load_analysis(path: Option<&Path>) -> Result<Option<StructuredAnalysis>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let contents = read_input(Some(path))?;
    let analysis: StructuredAnalysis = parse_document(&contents, Some(path))?;
    tracing::info!(
        "Loaded analysis with {} scene(s) from {}",
        analysis.scenes.len(),
        path.display()
    );
    Ok(Some(analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scene;
    use std::path::PathBuf;

    #[test]
    fn test_parse_document_yaml_and_json() {
        let yaml = "- id: 1\n  location: Forest\n  props: [wand]\n";
        let scenes: Vec<Scene> = parse_document(yaml, Some(&PathBuf::from("s.yaml"))).unwrap();
        assert!(scenes[0].props.contains("wand"));

        let json = r#"[{"id": 2, "location": "Forest"}]"#;
        let scenes: Vec<Scene> = parse_document(json, Some(&PathBuf::from("s.JSON"))).unwrap();
        assert_eq!(scenes[0].id, 2);
    }

    #[test]
    fn test_load_analysis_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, r#"{"scenes": [{"description": "Rain.", "type": "establishing"}]}"#)
            .unwrap();
        let analysis = load_analysis(Some(&path)).unwrap().unwrap();
        assert_eq!(analysis.scenes.len(), 1);
        assert!(load_analysis(None).unwrap().is_none());
    }
}
