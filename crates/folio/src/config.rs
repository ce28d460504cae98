#![forbid(unsafe_code)]

//! Editor-wide configuration.
//!
//! [`EditorConfig`] bundles the history and shortcut settings. It can be
//! built in code, read from environment variables, or (with the `config`
//! feature) loaded from TOML or JSON.
//!
//! # Example TOML
//!
//! ```toml
//! [history]
//! max_depth = 50
//! coalesce_window_ms = 300
//!
//! [shortcuts]
//! enabled = true
//! undo = ["ctrl+z"]
//! redo = ["ctrl+y"]
//! formatting = false
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_bindings::ShortcutConfig;
use folio_history::HistoryConfig;

/// Everything an [`Editor`](crate::Editor) can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EditorConfig {
    /// Undo depth and coalescing.
    pub history: HistoryConfig,
    /// Keyboard bindings.
    pub shortcuts: ShortcutConfig,
}

impl EditorConfig {
    /// Set the history section.
    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    /// Set the shortcut section.
    #[must_use]
    pub fn with_shortcuts(mut self, shortcuts: ShortcutConfig) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    /// Read both sections from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            history: HistoryConfig::from_env(),
            shortcuts: ShortcutConfig::from_env(),
        }
    }

    /// Clamp and dedup every section.
    #[must_use]
    pub fn validated(self) -> Self {
        Self {
            history: self.history.validated(),
            shortcuts: self.shortcuts.validated(),
        }
    }

    /// Load from a TOML string. The result is validated.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        Ok(config.validated())
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string. The result is validated.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config.validated())
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// Errors raised while loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML did not parse or did not match the schema.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serializing to TOML failed.
    #[cfg(feature = "config")]
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The JSON did not parse or did not match the schema.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
