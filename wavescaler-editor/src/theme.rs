//! Theme preference and its persistence.
//!
//! The chosen [`Theme`] is stored under the fixed key `"theme"` in a
//! [`PreferenceStore`]. `Auto` defers to the system appearance, resolved
//! through [`Theme::effective`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Theme actually applied once `Auto` is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// auto → light → dark → auto.
    pub fn next(self) -> Theme {
        match self {
            Theme::Auto => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Auto,
        }
    }

    /// Two-state toggle: light → dark, anything else → light.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn effective(self, system_prefers_dark: bool) -> EffectiveTheme {
        match self {
            Theme::Light => EffectiveTheme::Light,
            Theme::Dark => EffectiveTheme::Dark,
            Theme::Auto if system_prefers_dark => EffectiveTheme::Dark,
            Theme::Auto => EffectiveTheme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme '{0}' (expected auto, light or dark)")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------
// Preference storage
// ---------------------------------------------------------------

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("preference file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage for user preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON object file, created on first write.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self.read_all()?;
        Ok(values.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------
// Theme store
// ---------------------------------------------------------------

pub struct ThemeStore {
    theme: Theme,
    store: Box<dyn PreferenceStore>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore").field("theme", &self.theme).finish()
    }
}

impl ThemeStore {
    pub const KEY: &'static str = "theme";

    /// Read the saved theme, falling back to `default` when nothing valid
    /// is stored.
    pub fn load(store: Box<dyn PreferenceStore>, default: Theme) -> Self {
        let theme = match store.get(Self::KEY) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|e| {
                log::warn!("ignoring saved theme: {e}");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                log::warn!("could not read theme preference: {e}");
                default
            }
        };
        Self { theme, store }
    }

    pub fn in_memory(default: Theme) -> Self {
        Self::load(Box::new(MemoryPreferences::new()), default)
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn effective(&self, system_prefers_dark: bool) -> EffectiveTheme {
        self.theme.effective(system_prefers_dark)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist();
    }

    pub fn cycle(&mut self) -> Theme {
        self.set_theme(self.theme.next());
        self.theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set(Self::KEY, self.theme.as_str()) {
            log::warn!("could not save theme preference: {e}");
        }
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::in_memory(Theme::default())
    }
}
