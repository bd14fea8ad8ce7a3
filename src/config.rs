use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::build_optimizer::OptimizerParams;
use crate::core::logging::LoggingConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub optimizer: OptimizerParams,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `~/.config/statforge/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same fallbacks as
    /// [`AppConfig::load`].
    pub fn load_from(config_path: &std::path::Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("statforge").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
