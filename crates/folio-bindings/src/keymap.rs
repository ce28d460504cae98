#![forbid(unsafe_code)]

//! Keyboard shortcut mapping.
//!
//! # Default Bindings
//!
//! | Keys | Action |
//! |------|--------|
//! | Ctrl+Z | Undo |
//! | Ctrl+Y | Redo |
//! | Ctrl+Shift+Z | Redo |
//! | Ctrl+B | Bold |
//! | Ctrl+I | Italic |
//!
//! When a combination is bound to both undo and redo, undo wins.
//!
//! # Example
//!
//! ```
//! use folio_bindings::{Action, KeyEvent, ShortcutConfig, ShortcutMapper};
//!
//! let mapper = ShortcutMapper::new(ShortcutConfig::default());
//! assert_eq!(mapper.map(&KeyEvent::ctrl_char('z')), Some(Action::Undo));
//! assert_eq!(mapper.map(&KeyEvent::ctrl_char('y')), Some(Action::Redo));
//! ```

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::action::{Action, ExecCommand};
use crate::event::{KeyCombo, KeyEvent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which shortcuts are bound.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `FOLIO_DISABLE_SHORTCUTS` | bool | false | Turn every shortcut off |
/// | `FOLIO_REDO_SHIFT_Z` | bool | true | Bind Ctrl+Shift+Z to redo |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ShortcutConfig {
    /// Master switch. Default: true.
    pub enabled: bool,

    /// Combinations that undo. Default: Ctrl+Z.
    pub undo: Vec<KeyCombo>,

    /// Combinations that redo. Default: Ctrl+Y, Ctrl+Shift+Z.
    pub redo: Vec<KeyCombo>,

    /// Bind Ctrl+B / Ctrl+I to bold / italic. Default: true.
    pub formatting: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            undo: vec![KeyCombo::ctrl('z')],
            redo: vec![KeyCombo::ctrl('y'), KeyCombo::ctrl_shift('z')],
            formatting: true,
        }
    }
}

impl ShortcutConfig {
    /// A config with every shortcut turned off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Replace the undo bindings.
    #[must_use]
    pub fn with_undo_keys(mut self, keys: impl IntoIterator<Item = KeyCombo>) -> Self {
        self.undo = keys.into_iter().collect();
        self
    }

    /// Replace the redo bindings.
    #[must_use]
    pub fn with_redo_keys(mut self, keys: impl IntoIterator<Item = KeyCombo>) -> Self {
        self.redo = keys.into_iter().collect();
        self
    }

    /// Drop the Ctrl+Shift+Z redo binding.
    #[must_use]
    pub fn without_redo_shift_z(mut self) -> Self {
        let shift_z = KeyCombo::ctrl_shift('z');
        self.redo.retain(|combo| *combo != shift_z);
        self
    }

    /// Enable or disable the formatting shortcuts.
    #[must_use]
    pub fn with_formatting(mut self, formatting: bool) -> Self {
        self.formatting = formatting;
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `FOLIO_DISABLE_SHORTCUTS`: "1" or "true" turns shortcuts off
    /// - `FOLIO_REDO_SHIFT_Z`: "0" or "false" drops Ctrl+Shift+Z
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FOLIO_DISABLE_SHORTCUTS") {
            config.enabled = !(val == "1" || val.eq_ignore_ascii_case("true"));
        }

        if let Ok(val) = std::env::var("FOLIO_REDO_SHIFT_Z")
            && (val == "0" || val.eq_ignore_ascii_case("false"))
        {
            config = config.without_redo_shift_z();
        }

        config.validated()
    }

    /// Remove duplicate bindings and redo bindings that shadow undo.
    #[must_use]
    pub fn validated(mut self) -> Self {
        dedup(&mut self.undo);
        dedup(&mut self.redo);
        let undo = self.undo.clone();
        self.redo.retain(|combo| !undo.contains(combo));
        self
    }
}

fn dedup(keys: &mut Vec<KeyCombo>) {
    let mut seen = Vec::with_capacity(keys.len());
    keys.retain(|combo| {
        if seen.contains(combo) {
            false
        } else {
            seen.push(*combo);
            true
        }
    });
}

// ---------------------------------------------------------------------------
// Mapper
// ---------------------------------------------------------------------------

/// Maps key events to editor actions.
#[derive(Debug, Clone)]
pub struct ShortcutMapper {
    config: ShortcutConfig,
}

impl ShortcutMapper {
    /// Create a mapper. The config is validated first.
    #[must_use]
    pub fn new(config: ShortcutConfig) -> Self {
        Self {
            config: config.validated(),
        }
    }

    /// Create a mapper with the default bindings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ShortcutConfig::default())
    }

    /// Create a mapper from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ShortcutConfig::from_env())
    }

    /// Resolve a key event. Returns `None` for unbound keys, releases, and
    /// when shortcuts are disabled.
    #[must_use]
    pub fn map(&self, event: &KeyEvent) -> Option<Action> {
        if !self.config.enabled {
            return None;
        }
        let action = self.resolve(event)?;
        tracing::debug!(
            key = ?event.code,
            modifiers = ?event.modifiers,
            action = action.name(),
            "shortcut matched"
        );
        Some(action)
    }

    fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        if self.config.undo.iter().any(|combo| combo.matches(event)) {
            return Some(Action::Undo);
        }
        if self.config.redo.iter().any(|combo| combo.matches(event)) {
            return Some(Action::Redo);
        }
        if self.config.formatting {
            if KeyCombo::ctrl('b').matches(event) {
                return Some(Action::Exec(ExecCommand::Bold));
            }
            if KeyCombo::ctrl('i').matches(event) {
                return Some(Action::Exec(ExecCommand::Italic));
            }
        }
        None
    }

    /// Every active binding, in resolution order.
    #[must_use]
    pub fn bindings(&self) -> Vec<(KeyCombo, Action)> {
        if !self.config.enabled {
            return Vec::new();
        }
        let mut out: Vec<(KeyCombo, Action)> = self
            .config
            .undo
            .iter()
            .map(|combo| (*combo, Action::Undo))
            .chain(self.config.redo.iter().map(|combo| (*combo, Action::Redo)))
            .collect();
        if self.config.formatting {
            out.push((KeyCombo::ctrl('b'), Action::Exec(ExecCommand::Bold)));
            out.push((KeyCombo::ctrl('i'), Action::Exec(ExecCommand::Italic)));
        }
        out
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ShortcutConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: ShortcutConfig) {
        self.config = config.validated();
    }
}

impl Default for ShortcutMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}
