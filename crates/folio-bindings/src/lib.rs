#![forbid(unsafe_code)]

//! Bindings between user input and the editor.
//!
//! # Role in Folio
//! `folio-bindings` turns key presses and toolbar clicks into [`Action`]s
//! and keeps history buttons enabled only when they would do something.
//! It never touches the document; the facade crate executes actions.

pub mod action;
pub mod event;
pub mod keymap;
pub mod toolbar;

pub use action::{Action, DialogKind, ExecCommand, UnknownCommand};
pub use event::{KeyCode, KeyCombo, KeyComboError, KeyEvent, KeyEventKind, Modifiers};
pub use keymap::{ShortcutConfig, ShortcutMapper};
pub use toolbar::{Button, Toolbar};
