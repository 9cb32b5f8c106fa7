//! TOML configuration for the circuit binary

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "circuit.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Where exported rankings are written
    pub report_dir: PathBuf,
    /// Leave players with zero points out of text reports
    pub hide_zero_point_players: bool,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("circuit.db"),
            log_level: "info".to_string(),
            report_dir: PathBuf::from("reports"),
            hide_zero_point_players: true,
        }
    }
}

impl CircuitConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
            }
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
