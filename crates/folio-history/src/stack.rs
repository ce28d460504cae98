#![forbid(unsafe_code)]

//! Bounded, position-tracked history stack.
//!
//! [`HistoryStack`] keeps every entry in one [`VecDeque`] and a `position`
//! cursor naming the entry that matches live state. Entries are stored as
//! [`Arc`]s, so handing one out on undo or redo never copies it.
//!
//! # Architecture
//!
//! ```text
//! push(s3)
//! ┌────────────────────────────────────────────┐
//! │ entries:  [s0, s1, s2, s3]                 │
//! │ position:              ^                   │
//! └────────────────────────────────────────────┘
//!
//! move_back() x2
//! ┌────────────────────────────────────────────┐
//! │ entries:  [s0, s1, s2, s3]                 │
//! │ position:      ^                           │
//! └────────────────────────────────────────────┘
//!
//! push(s4): redo branch dropped
//! ┌────────────────────────────────────────────┐
//! │ entries:  [s0, s1, s4]                     │
//! │ position:          ^                       │
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Capacity
//!
//! When a push takes the stack past `max_depth` entries, the oldest entries
//! are evicted from the front and `position` is decremented by the same
//! amount, so it keeps naming the same entry. A push always leaves `position`
//! at the top, so eviction can never strand it. The new front becomes the
//! floor that undo cannot pass.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Smallest capacity a stack accepts; anything lower is raised to this.
pub const MIN_DEPTH: usize = 1;

/// A bounded history of `Arc<T>` entries with a current-position cursor.
///
/// # Invariants
///
/// 1. `entries` is never empty.
/// 2. `position < entries.len()`.
/// 3. `entries.len() <= max_depth` after every operation.
/// 4. After `push`, `position == entries.len() - 1`.
pub struct HistoryStack<T> {
    entries: VecDeque<Arc<T>>,
    position: usize,
    max_depth: usize,
}

impl<T: fmt::Debug> fmt::Debug for HistoryStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStack")
            .field("len", &self.entries.len())
            .field("position", &self.position)
            .field("max_depth", &self.max_depth)
            .field("current", self.current())
            .finish()
    }
}

impl<T> HistoryStack<T> {
    /// Create a stack holding only `seed`.
    ///
    /// A `max_depth` below [`MIN_DEPTH`] is raised to it.
    #[must_use]
    pub fn new(seed: T, max_depth: usize) -> Self {
        Self::from_arc(Arc::new(seed), max_depth)
    }

    /// Create a stack from an already shared seed.
    #[must_use]
    pub fn from_arc(seed: Arc<T>, max_depth: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(seed);
        Self {
            entries,
            position: 0,
            max_depth: max_depth.max(MIN_DEPTH),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Push a new entry, discarding everything after `position` first.
    ///
    /// Returns how many entries were evicted from the front.
    pub fn push(&mut self, entry: T) -> usize {
        self.push_arc(Arc::new(entry))
    }

    /// Push a pre-wrapped entry.
    pub fn push_arc(&mut self, entry: Arc<T>) -> usize {
        self.entries.truncate(self.position + 1);
        self.entries.push_back(entry);
        self.position = self.entries.len() - 1;
        self.enforce_depth()
    }

    /// Step back one entry and return it.
    ///
    /// At the floor this is a no-op that returns the current entry.
    pub fn move_back(&mut self) -> Arc<T> {
        if self.can_undo() {
            self.position -= 1;
        }
        Arc::clone(self.current())
    }

    /// Step forward one entry and return it.
    ///
    /// With nothing to redo this is a no-op: `position` is left alone, so a
    /// later push still truncates from the right place.
    pub fn move_forward(&mut self) -> Arc<T> {
        if self.can_redo() {
            self.position += 1;
        }
        Arc::clone(self.current())
    }

    /// The entry `move_back` would return, without moving.
    #[must_use]
    pub fn peek_back(&self) -> Option<&Arc<T>> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    /// The entry `move_forward` would return, without moving.
    #[must_use]
    pub fn peek_forward(&self) -> Option<&Arc<T>> {
        self.entries.get(self.position + 1)
    }

    /// Drop every entry and reseed with `seed`.
    pub fn reset(&mut self, seed: T) {
        self.entries.clear();
        self.entries.push_back(Arc::new(seed));
        self.position = 0;
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// The entry at `position`.
    #[must_use]
    pub fn current(&self) -> &Arc<T> {
        &self.entries[self.position]
    }

    /// Whether there is an entry before `position`.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    /// Whether there is an entry after `position`.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Index of the current entry.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of retained entries (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the stack holds at least its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.position
    }

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - 1 - self.position
    }

    /// Capacity bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Entries from floor to top.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Change the capacity bound, evicting from the front if needed.
    ///
    /// Eviction never removes the current entry: if `position` would fall
    /// off the front, only entries before it are dropped and the redo
    /// branch is trimmed from the back instead.
    pub fn set_max_depth(&mut self, max_depth: usize) -> usize {
        self.max_depth = max_depth.max(MIN_DEPTH);
        let mut evicted = self.enforce_depth();
        while self.entries.len() > self.max_depth {
            self.entries.pop_back();
            evicted += 1;
        }
        evicted
    }

    /// Evict from the front while over capacity, keeping `position` on the
    /// same entry.
    fn enforce_depth(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.max_depth && self.position > 0 {
            self.entries.pop_front();
            self.position -= 1;
            evicted += 1;
        }
        evicted
    }
}

// ============================================================================
// Tests
// ============================================================================
