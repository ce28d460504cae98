#![forbid(unsafe_code)]

//! History entries.

use folio_doc::{EditableSurface, SelectionSnapshot, SerializedDocument};

/// Serialized content plus selection at one point in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Full serialized content.
    pub content: SerializedDocument,
    /// Selection at capture time.
    pub selection: SelectionSnapshot,
}

impl Snapshot {
    /// Create a snapshot from parts.
    #[must_use]
    pub fn new(content: SerializedDocument, selection: SelectionSnapshot) -> Self {
        Self { content, selection }
    }

    /// Capture content and selection from a live surface.
    #[must_use]
    pub fn capture<S: EditableSurface + ?Sized>(surface: &S) -> Self {
        Self {
            content: surface.serialize(),
            selection: surface.capture_selection(),
        }
    }

    /// Whether `content` is byte-equal to this snapshot's content.
    #[must_use]
    pub fn same_content(&self, content: &SerializedDocument) -> bool {
        self.content == *content
    }
}
