#![forbid(unsafe_code)]

//! Caller-clocked debounce for high-frequency edits.
//!
//! Keystroke-level edits would flood the history if each one were
//! registered. [`CoalesceWindow`] lets the editing layer note every
//! mutation and register a single change once input has been quiet for the
//! configured window. Time is always passed in by the caller; nothing here
//! reads a clock or schedules a timer.
//!
//! # Example
//!
//! ```
//! use folio_history::CoalesceWindow;
//! use web_time::{Duration, Instant};
//!
//! let mut window = CoalesceWindow::new(Duration::from_millis(300));
//! let t0 = Instant::now();
//!
//! assert!(!window.note_mutation(t0));
//! assert!(!window.note_mutation(t0 + Duration::from_millis(100)));
//! // Not quiet long enough yet.
//! assert!(!window.poll(t0 + Duration::from_millis(350)));
//! // 300ms after the last mutation: time to register.
//! assert!(window.poll(t0 + Duration::from_millis(400)));
//! assert!(!window.is_pending());
//! ```

use web_time::{Duration, Instant};

/// State of a [`CoalesceWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    /// Nothing noted since the last registration.
    Idle,
    /// Mutations noted; waiting for a quiet period.
    Pending { first: Instant, last: Instant },
}

/// Groups bursts of mutations into one registration.
#[derive(Debug, Clone)]
pub struct CoalesceWindow {
    window: Duration,
    state: WindowState,
}

impl CoalesceWindow {
    /// Create a window. `Duration::ZERO` disables coalescing.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: WindowState::Idle,
        }
    }

    /// A window that never defers.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Record a mutation at `now`.
    ///
    /// Returns `true` when the caller should register the change right
    /// away (coalescing disabled); otherwise the change is pending until
    /// [`poll`](Self::poll) or [`flush`](Self::flush) says so.
    pub fn note_mutation(&mut self, now: Instant) -> bool {
        if self.window.is_zero() {
            return true;
        }
        self.state = match self.state {
            WindowState::Idle => WindowState::Pending {
                first: now,
                last: now,
            },
            WindowState::Pending { first, .. } => WindowState::Pending { first, last: now },
        };
        false
    }

    /// Check whether the quiet period has elapsed at `now`.
    ///
    /// Returns `true` once per burst; the window goes idle again.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let WindowState::Pending { last, .. } = self.state
            && now.saturating_duration_since(last) >= self.window
        {
            self.state = WindowState::Idle;
            return true;
        }
        false
    }

    /// End any pending burst immediately.
    ///
    /// Returns `true` if something was pending. Call this before undo/redo
    /// or any explicit command so the burst is not lost.
    pub fn flush(&mut self) -> bool {
        let pending = self.is_pending();
        self.state = WindowState::Idle;
        pending
    }

    /// Whether mutations are waiting to be registered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, WindowState::Pending { .. })
    }

    /// How long the current burst has lasted at `now`.
    #[must_use]
    pub fn burst_age(&self, now: Instant) -> Option<Duration> {
        match self.state {
            WindowState::Idle => None,
            WindowState::Pending { first, .. } => Some(now.saturating_duration_since(first)),
        }
    }

    /// The configured window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Change the window. A pending burst stays pending.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}

impl Default for CoalesceWindow {
    fn default() -> Self {
        Self::disabled()
    }
}
