#![forbid(unsafe_code)]

//! Folio public facade crate.
//!
//! This crate provides the stable surface area for hosts embedding the
//! editor core. It re-exports the document, history, and binding types and
//! adds [`Editor`], which ties them together into one instance with
//! undo/redo, keyboard shortcuts, toolbar state, and dialog commands.
//!
//! # Example
//!
//! ```
//! use folio::prelude::*;
//!
//! let mut editor = Editor::new("<p>Foo</p>").unwrap();
//! editor.document_mut().append_markup("<p>Bar</p>").unwrap();
//! editor.register_change();
//!
//! assert!(editor.click_button("Undo").unwrap().is_some());
//! assert_eq!(editor.markup(), "<p>Foo</p>");
//! ```

pub mod config;
pub mod dialog;
pub mod editor;

use thiserror::Error;

// --- Document re-exports ---------------------------------------------------

pub use folio_doc::{
    Document, EditError, EditableSurface, Element, MarkupError, Node, NodePath, Point,
    RestoreOutcome, Selection, SelectionSnapshot, SerializedDocument,
};

// --- History re-exports ----------------------------------------------------

pub use folio_history::{
    ChangeOutcome, CoalesceWindow, HistoryConfig, HistoryError, HistoryStack, HistoryStatus,
    Snapshot, UndoRedo,
};

// --- Binding re-exports ----------------------------------------------------

pub use folio_bindings::{
    Action, Button, DialogKind, ExecCommand, KeyCode, KeyCombo, KeyComboError, KeyEvent,
    KeyEventKind, Modifiers, ShortcutConfig, ShortcutMapper, Toolbar, UnknownCommand,
};

// --- Facade ------------------------------------------------------------------

pub use config::{ConfigError, EditorConfig};
pub use dialog::{
    DialogCommand, DialogPayload, DialogSpec, ImageAttrs, LinkAttrs, OpenedDialog, TableSpec,
};
pub use editor::{ActionOutcome, Editor};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Markup could not be parsed.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// Moving through history failed.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// A selection-driven edit could not be applied.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A command or dialog identifier is unknown.
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A dialog was submitted with another dialog's fields.
    #[error("payload does not belong to the {dialog} dialog")]
    PayloadMismatch { dialog: DialogKind },

    /// The dialog has nothing to submit.
    #[error("the {dialog} dialog cannot be submitted")]
    NotSubmittable { dialog: DialogKind },
}

/// Standard result type for editor APIs.
pub type Result<T> = std::result::Result<T, EditorError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Action, ActionOutcome, ChangeOutcome, DialogKind, DialogPayload, Document, Editor,
        EditorConfig, EditorError, ExecCommand, ImageAttrs, KeyCode, KeyEvent, LinkAttrs,
        Modifiers, Point, Result, TableSpec,
    };

    pub use crate::{bindings, doc, history};
}

pub use folio_bindings as bindings;
pub use folio_doc as doc;
pub use folio_history as history;
