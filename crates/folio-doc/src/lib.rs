#![forbid(unsafe_code)]

//! Document model: content tree, markup codec, and selection snapshots.
//!
//! # Role in Folio
//! `folio-doc` owns the live editable content. It knows how to serialize
//! that content to canonical markup and back, how to capture the user's
//! selection, and how to put a captured selection back after the tree has
//! drifted underneath it.
//!
//! # How it fits in the system
//! The history engine (`folio-history`) never looks inside a document. It
//! talks to the [`EditableSurface`] trait, which [`Document`] implements.
//! Editing commands in the facade crate use the [`edit`] primitives and then
//! ask history to record the result.

pub mod document;
pub mod edit;
pub mod markup;
pub mod node;
pub mod selection;
pub mod surface;

pub use document::Document;
pub use edit::{EditError, ListKind};
pub use markup::{MAX_DEPTH, MarkupError};
pub use node::{Element, Node, NodePath};
pub use selection::{Point, RestoreOutcome, Selection, SelectionSnapshot};
pub use surface::{EditableSurface, SerializedDocument};
