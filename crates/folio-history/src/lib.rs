#![forbid(unsafe_code)]

//! Snapshot undo/redo history.
//!
//! # Role in Folio
//! `folio-history` records full snapshots of an [`EditableSurface`]
//! (serialized content plus selection) and moves live content back and
//! forth through them.
//!
//! # Primary responsibilities
//! - **HistoryStack**: bounded entries with a position cursor.
//! - **UndoRedo**: change detection, batches, undo, redo, reset.
//! - **CoalesceWindow**: caller-clocked grouping of keystroke bursts.
//! - **HistoryConfig**: depth and window tunables, env overrides.
//!
//! # Example
//!
//! ```
//! use folio_doc::Document;
//! use folio_history::UndoRedo;
//!
//! let mut doc = Document::from_markup("<p>Foo</p>").unwrap();
//! let mut history = UndoRedo::with_defaults(&doc);
//!
//! doc.append_markup("<p>Bar</p>").unwrap();
//! history.register_change(&doc);
//!
//! history.undo(&mut doc).unwrap();
//! assert_eq!(doc.to_markup(), "<p>Foo</p>");
//! assert!(history.can_redo());
//! ```
//!
//! [`EditableSurface`]: folio_doc::EditableSurface

pub mod coalesce;
pub mod config;
pub mod controller;
pub mod error;
pub mod snapshot;
pub mod stack;

pub use coalesce::CoalesceWindow;
pub use config::HistoryConfig;
pub use controller::{ChangeOutcome, HistoryStatus, UndoRedo};
pub use error::HistoryError;
pub use snapshot::Snapshot;
pub use stack::HistoryStack;
