#![forbid(unsafe_code)]

//! The seam between the history engine and whatever owns live content.

use std::fmt;
use std::sync::Arc;

use crate::markup::MarkupError;
use crate::selection::{RestoreOutcome, SelectionSnapshot};

/// Immutable serialized form of the full editable content.
///
/// Cloning shares the underlying buffer. Equality is byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedDocument(Arc<str>);

impl SerializedDocument {
    /// Wrap serialized markup.
    #[must_use]
    pub fn new(markup: impl Into<Arc<str>>) -> Self {
        Self(markup.into())
    }

    /// Borrow the markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SerializedDocument {
    fn from(markup: String) -> Self {
        Self(markup.into())
    }
}

impl From<&str> for SerializedDocument {
    fn from(markup: &str) -> Self {
        Self(markup.into())
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Live editable content the history engine snapshots and restores.
///
/// [`Document`](crate::Document) implements this; hosts that keep content
/// elsewhere implement it over their own tree.
pub trait EditableSurface {
    /// Serialize the current content.
    fn serialize(&self) -> SerializedDocument;

    /// Replace the content wholesale.
    ///
    /// An error means the serialized form is unreadable; the surface must be
    /// left as it was.
    fn apply_content(&mut self, content: &SerializedDocument) -> Result<(), MarkupError>;

    /// Read the live selection.
    fn capture_selection(&self) -> SelectionSnapshot;

    /// Re-establish a captured selection. Never fails; degrades instead.
    fn restore_selection(&mut self, snapshot: &SelectionSnapshot) -> RestoreOutcome;
}
