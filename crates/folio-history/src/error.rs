#![forbid(unsafe_code)]

//! History error types.

use folio_doc::MarkupError;
use thiserror::Error;

/// Failures while moving through history.
///
/// Undo past the floor or redo past the top are not errors; those calls
/// return `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A stored snapshot could not be applied to the surface.
    ///
    /// The stack position is left where it was, so the current entry still
    /// describes live content.
    #[error("snapshot at position {position} could not be applied")]
    CorruptSnapshot {
        /// Stack index of the unreadable entry.
        position: usize,
        #[source]
        source: MarkupError,
    },
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
