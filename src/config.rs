//! Runtime configuration for the donna binary.
//!
//! Read from `config.toml` under the platform config directory; every field
//! has a default so a missing or partial file is fine.

use crate::error::{DonnaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonnaConfig {
    /// Path to the persisted task collection.
    pub store_path: PathBuf,
    /// Maximum reminder-loop sleep between due checks, in seconds.
    pub poll_ceiling_secs: u64,
    /// Display-duration hint passed with each notification, in seconds.
    pub toast_duration_secs: u32,
}

impl Default for DonnaConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            poll_ceiling_secs: 60,
            toast_duration_secs: 10,
        }
    }
}

impl DonnaConfig {
    /// Returns the path to the config file (`<config_dir>/donna/config.toml`).
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("donna").join("config.toml"))
    }

    /// Load the user config, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load() -> Self {
        let Some(path) = Self::config_file_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!("ignoring invalid config at {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse a config file at an explicit path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DonnaError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| DonnaError::Config(format!("cannot parse {}: {e}", path.display())))
    }
}

/// Default location of the task store (`<data_dir>/donna/tasks.json`).
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("donna").join("tasks.json"))
        .unwrap_or_else(|| PathBuf::from("tasks.json"))
}
