#![forbid(unsafe_code)]

//! The per-editor undo/redo controller.
//!
//! [`UndoRedo`] wires an [`EditableSurface`] to a [`HistoryStack`] of
//! [`Snapshot`]s. Editing code mutates the surface and then calls
//! [`register_change`](UndoRedo::register_change); bindings call
//! [`undo`](UndoRedo::undo) and [`redo`](UndoRedo::redo).
//!
//! After every operation the entry at the stack position matches the live
//! content, provided changes are registered in the same turn as the
//! mutation that caused them.
//!
//! # Batches
//!
//! [`begin_batch`](UndoRedo::begin_batch) and
//! [`end_batch`](UndoRedo::end_batch) bracket a group of mutations that
//! should become one entry. Batches nest; only the outermost `end_batch`
//! records. Registrations inside a batch report
//! [`ChangeOutcome::Deferred`].

use folio_doc::EditableSurface;

use crate::config::HistoryConfig;
use crate::error::{HistoryError, Result};
use crate::snapshot::Snapshot;
use crate::stack::HistoryStack;

/// What [`UndoRedo::register_change`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Content matched the current entry; nothing was recorded.
    Unchanged,
    /// A batch is open; the change will be recorded when it closes.
    Deferred,
    /// A new entry was pushed.
    Recorded,
}

/// Point-in-time view of the history, for enabling affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    /// Undo would do something.
    pub can_undo: bool,
    /// Redo would do something.
    pub can_redo: bool,
    /// Current stack position.
    pub position: usize,
    /// Entries retained.
    pub len: usize,
    /// A batch is open.
    pub batch_open: bool,
}

/// Snapshot-based undo/redo for one editor instance.
#[derive(Debug)]
pub struct UndoRedo {
    stack: HistoryStack<Snapshot>,
    batch_depth: usize,
}

impl UndoRedo {
    /// Create a controller seeded from the surface's current state.
    #[must_use]
    pub fn new<S: EditableSurface + ?Sized>(surface: &S, config: HistoryConfig) -> Self {
        let config = config.validated();
        Self {
            stack: HistoryStack::new(Snapshot::capture(surface), config.max_depth),
            batch_depth: 0,
        }
    }

    /// Create a controller with [`HistoryConfig::default`].
    #[must_use]
    pub fn with_defaults<S: EditableSurface + ?Sized>(surface: &S) -> Self {
        Self::new(surface, HistoryConfig::default())
    }

    // ====================================================================
    // Recording
    // ====================================================================

    /// Record the surface's current state if it differs from the current
    /// entry.
    pub fn register_change<S: EditableSurface + ?Sized>(&mut self, surface: &S) -> ChangeOutcome {
        let _span = tracing::debug_span!(
            "history.register_change",
            position = self.stack.position(),
            depth = self.stack.len(),
        )
        .entered();

        let content = surface.serialize();
        if self.stack.current().same_content(&content) {
            tracing::debug!("content unchanged; nothing recorded");
            return ChangeOutcome::Unchanged;
        }
        if self.batch_depth > 0 {
            tracing::debug!(batch_depth = self.batch_depth, "change deferred to batch end");
            return ChangeOutcome::Deferred;
        }

        let discarded = self.stack.redo_depth();
        let evicted = self
            .stack
            .push(Snapshot::new(content, surface.capture_selection()));
        tracing::debug!(
            position = self.stack.position(),
            discarded,
            evicted,
            "snapshot recorded"
        );
        ChangeOutcome::Recorded
    }

    /// Open a batch. Nested calls must be matched by as many
    /// [`end_batch`](Self::end_batch) calls.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
        tracing::debug!(batch_depth = self.batch_depth, "batch opened");
    }

    /// Close a batch. Closing the outermost batch registers the change.
    pub fn end_batch<S: EditableSurface + ?Sized>(&mut self, surface: &S) -> ChangeOutcome {
        if self.batch_depth == 0 {
            tracing::warn!("end_batch called with no open batch");
        }
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth > 0 {
            return ChangeOutcome::Deferred;
        }
        self.register_change(surface)
    }

    /// Run `edit` inside a batch and register the result once.
    pub fn batch<S, R>(
        &mut self,
        surface: &mut S,
        edit: impl FnOnce(&mut S) -> R,
    ) -> (R, ChangeOutcome)
    where
        S: EditableSurface + ?Sized,
    {
        self.begin_batch();
        let value = edit(surface);
        let outcome = self.end_batch(&*surface);
        (value, outcome)
    }

    // ====================================================================
    // Traversal
    // ====================================================================

    /// Step back one entry, replacing live content and selection.
    ///
    /// Returns `Ok(false)` without touching the surface when there is
    /// nothing to undo. An open batch is closed (and recorded) first.
    pub fn undo<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
        let _span = tracing::debug_span!(
            "history.undo",
            position = self.stack.position(),
            depth = self.stack.len(),
        )
        .entered();

        self.close_open_batch(&*surface);
        let Some(target) = self.stack.peek_back().cloned() else {
            tracing::debug!("at floor; undo ignored");
            return Ok(false);
        };
        Self::apply(surface, &target, self.stack.position() - 1)?;
        self.stack.move_back();
        tracing::debug!(position = self.stack.position(), "undo applied");
        Ok(true)
    }

    /// Step forward one entry, replacing live content and selection.
    ///
    /// Returns `Ok(false)` without touching the surface when there is
    /// nothing to redo. An open batch is closed (and recorded) first, which
    /// discards the redo branch if it changed anything.
    pub fn redo<S: EditableSurface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
        let _span = tracing::debug_span!(
            "history.redo",
            position = self.stack.position(),
            depth = self.stack.len(),
        )
        .entered();

        self.close_open_batch(&*surface);
        let Some(target) = self.stack.peek_forward().cloned() else {
            tracing::debug!("at top; redo ignored");
            return Ok(false);
        };
        Self::apply(surface, &target, self.stack.position() + 1)?;
        self.stack.move_forward();
        tracing::debug!(position = self.stack.position(), "redo applied");
        Ok(true)
    }

    /// Drop all history and reseed from the surface.
    pub fn reset<S: EditableSurface + ?Sized>(&mut self, surface: &S) {
        self.batch_depth = 0;
        self.stack.reset(Snapshot::capture(surface));
        tracing::debug!("history reset");
    }

    fn close_open_batch<S: EditableSurface + ?Sized>(&mut self, surface: &S) {
        if self.batch_depth > 0 {
            tracing::warn!(
                batch_depth = self.batch_depth,
                "history traversal with an open batch; closing it"
            );
            self.batch_depth = 0;
            self.register_change(surface);
        }
    }

    fn apply<S: EditableSurface + ?Sized>(
        surface: &mut S,
        target: &Snapshot,
        position: usize,
    ) -> Result<()> {
        surface.apply_content(&target.content).map_err(|source| {
            tracing::warn!(position, error = %source, "stored snapshot is unreadable");
            HistoryError::CorruptSnapshot { position, source }
        })?;
        surface.restore_selection(&target.selection);
        Ok(())
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Whether [`undo`](Self::undo) would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    /// Whether [`redo`](Self::redo) would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    /// Whether a batch is open.
    #[must_use]
    pub fn batch_open(&self) -> bool {
        self.batch_depth > 0
    }

    /// Current state for toolbars and status lines.
    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.stack.can_undo(),
            can_redo: self.stack.can_redo(),
            position: self.stack.position(),
            len: self.stack.len(),
            batch_open: self.batch_open(),
        }
    }

    /// The entry matching live content.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        self.stack.current()
    }

    /// The underlying stack.
    #[must_use]
    pub fn stack(&self) -> &HistoryStack<Snapshot> {
        &self.stack
    }

    /// Change the depth bound. Returns how many entries were evicted.
    pub fn set_max_depth(&mut self, max_depth: usize) -> usize {
        self.stack.set_max_depth(max_depth)
    }
}

// ============================================================================
// Tests
// ============================================================================
