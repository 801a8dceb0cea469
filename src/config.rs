//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SceneweaveError;
use crate::segmentation::SegmentationConfig;
use crate::services::{ContinuityThresholds, EnhancerConfig, ToneConfig};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CONFIG_ENV_VAR: &str = "SCENEWEAVE_CONFIG";
pub const DATA_PATH_ENV_VAR: &str = "SCENEWEAVE_DATA_PATH";
pub const DATA_DIR_NAME: &str = ".sceneweave";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub segmentation: SegmentationConfig,
    pub continuity: ContinuityThresholds,
    pub enhancer: EnhancerConfig,
    pub tone: ToneConfig,
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self, SceneweaveError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String, SceneweaveError> {
        toml::to_string_pretty(self).map_err(|e| SceneweaveError::Config(e.to_string()))
    }
}

/// Resolve the data directory.
///
/// Priority: explicit path > SCENEWEAVE_DATA_PATH env > ./.sceneweave (if exists) > ~/.sceneweave
pub fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| std::env::var(DATA_PATH_ENV_VAR).ok().map(PathBuf::from))
        .or_else(|| {
            let local_path = Path::new(DATA_DIR_NAME);
            if local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
        })
}

/// Load configuration with priority:
/// 1. `{data_path}/config.toml` file
/// 2. `SCENEWEAVE_CONFIG` env var (JSON)
/// 3. Defaults
pub fn load_config(data_path: &Path) -> AppConfig {
    load_config_with_env(data_path, std::env::var(CONFIG_ENV_VAR).ok())
}

fn load_config_with_env(data_path: &Path, env_json: Option<String>) -> AppConfig {
    let config_path = data_path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match AppConfig::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {}: {}. Using default.",
                        config_path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read {}: {}. Using default.",
                    config_path.display(),
                    e
                );
            }
        }
    }

    if let Some(json) = env_json {
        match serde_json::from_str::<AppConfig>(&json) {
            Ok(config) => {
                info!("Loaded config from {} env", CONFIG_ENV_VAR);
                return config;
            }
            Err(e) => {
                warn!("Failed to parse {}: {}. Using default.", CONFIG_ENV_VAR, e);
            }
        }
    }

    AppConfig::default()
}
