//! Application configuration for the capture side
//!
//! Display parameters (time scale, trigger level, ...) are runtime-only and
//! never persisted; what is worth keeping across runs is how to open the
//! capture session. Stored as YAML. A missing or unreadable file falls back
//! to defaults with a logged warning rather than failing startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::feed::FeedConfig;
use crate::types::DEFAULT_CAPACITY;

/// Capture-side configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Ring capacity in samples per channel
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Input stream settings
    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            feed: FeedConfig::default(),
        }
    }
}

impl ScopeConfig {
    /// Load configuration from a YAML file, falling back to defaults if the
    /// file is missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        log::info!("Config saved to {:?}", path);
        Ok(())
    }
}

/// Default config file location: `<user config dir>/scope/config.yaml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scope")
        .join("config.yaml")
}
