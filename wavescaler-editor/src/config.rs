//! Editor configuration, loaded from TOML.
//!
//! ```toml
//! history_capacity = 100
//! default_theme = "dark"
//! share_base_url = "https://wave.example/"
//! preferences_path = "/home/me/.config/wavescaler/prefs.json"
//! pretty_output = true
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wavescaler_core::{HistoryConfig, DEFAULT_CAPACITY};

use crate::theme::{FilePreferences, MemoryPreferences, PreferenceStore, Theme, ThemeStore};

pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:5173/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub default_theme: Theme,
    pub share_base_url: String,
    /// Backing file for preferences; in-memory when unset.
    pub preferences_path: Option<PathBuf>,
    /// Default indentation for generated text.
    pub pretty_output: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            default_theme: Theme::Auto,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            preferences_path: None,
            pretty_output: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig::new(self.history_capacity)
    }

    pub fn preference_store(&self) -> Box<dyn PreferenceStore> {
        match &self.preferences_path {
            Some(path) => Box::new(FilePreferences::new(path)),
            None => Box::new(MemoryPreferences::new()),
        }
    }

    pub fn theme_store(&self) -> ThemeStore {
        ThemeStore::load(self.preference_store(), self.default_theme)
    }
}
