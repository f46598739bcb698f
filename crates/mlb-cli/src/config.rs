//! TOML configuration
//!
//! ```toml
//! [workspace]
//! max_history_size = 100
//! activity_id = "workshop-3"
//!
//! [gates]
//! min_card_pairs = 3
//! pair_documentation_ratio = 0.75
//! ```
//!
//! Both tables and every key are optional.

use mlb_gates::GateThresholds;
use mlb_workspace::WorkspaceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub workspace: WorkspaceConfig,
    pub gates: GateThresholds,
}

impl AppConfig {
    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`toml::de::Error`] for malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from a file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file is unreadable or malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    ///
    /// # Errors
    /// See [`Self::from_path`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_path)
    }
}
