#![forbid(unsafe_code)]

//! Toolbar button state.
//!
//! A [`Toolbar`] is a list of named buttons. History buttons follow the
//! controller: call [`Toolbar::sync`] with the latest
//! [`HistoryStatus`] after every operation. Clicking a disabled or unknown
//! button yields nothing.

use folio_history::HistoryStatus;

use crate::action::{Action, DialogKind, ExecCommand};

/// One toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Identifier, e.g. `"Undo"`.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// What clicking does.
    pub action: Action,
    /// Whether the button accepts clicks.
    pub enabled: bool,
}

impl Button {
    /// Create an enabled button whose name is the action's name.
    #[must_use]
    pub const fn new(title: &'static str, action: Action) -> Self {
        Self {
            name: action.name(),
            title,
            action,
            enabled: true,
        }
    }
}

/// An ordered set of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    buttons: Vec<Button>,
}

impl Toolbar {
    /// Build a toolbar from buttons.
    #[must_use]
    pub fn new(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }

    /// The standard editor toolbar, with Undo/Redo starting disabled.
    #[must_use]
    pub fn standard() -> Self {
        let mut toolbar = Self::new(vec![
            Button::new("Strong", Action::Exec(ExecCommand::Bold)),
            Button::new("Emphasis", Action::Exec(ExecCommand::Italic)),
            Button::new("Superscript", Action::Exec(ExecCommand::Superscript)),
            Button::new("Subscript", Action::Exec(ExecCommand::Subscript)),
            Button::new("Ordered List", Action::Exec(ExecCommand::InsertOrderedList)),
            Button::new("Unordered List", Action::Exec(ExecCommand::InsertUnorderedList)),
            Button::new("Indent", Action::Exec(ExecCommand::Indent)),
            Button::new("Outdent", Action::Exec(ExecCommand::Outdent)),
            Button::new("Link", Action::OpenDialog(DialogKind::CreateLink)),
            Button::new("Unlink", Action::Exec(ExecCommand::Unlink)),
            Button::new("Image", Action::OpenDialog(DialogKind::InsertImage)),
            Button::new("Table", Action::OpenDialog(DialogKind::InsertTable)),
            Button::new("Paste from Word", Action::OpenDialog(DialogKind::Paste)),
            Button::new("Undo", Action::Undo),
            Button::new("Redo", Action::Redo),
            Button::new("Preview", Action::OpenDialog(DialogKind::Preview)),
        ]);
        toolbar.sync(HistoryStatus::default());
        toolbar
    }

    /// Enable or disable history buttons from `status`.
    pub fn sync(&mut self, status: HistoryStatus) {
        for button in &mut self.buttons {
            match button.action {
                Action::Undo => button.enabled = status.can_undo,
                Action::Redo => button.enabled = status.can_redo,
                _ => {}
            }
        }
    }

    /// Click a button by name.
    ///
    /// Returns the button's action if it exists and is enabled.
    #[must_use]
    pub fn click(&self, name: &str) -> Option<Action> {
        let Some(button) = self.button(name) else {
            tracing::debug!(name, "click on unknown toolbar button");
            return None;
        };
        if !button.enabled {
            tracing::debug!(name, "click on disabled toolbar button ignored");
            return None;
        }
        Some(button.action)
    }

    /// Whether a button is enabled; `None` if it does not exist.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.button(name).map(|button| button.enabled)
    }

    /// Look up a button.
    #[must_use]
    pub fn button(&self, name: &str) -> Option<&Button> {
        self.buttons.iter().find(|button| button.name == name)
    }

    /// All buttons in display order.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::standard()
    }
}
