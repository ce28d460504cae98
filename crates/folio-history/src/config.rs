#![forbid(unsafe_code)]

//! History configuration.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `FOLIO_HISTORY_MAX_DEPTH` | usize | 10 | Entries retained, seed included |
//! | `FOLIO_COALESCE_WINDOW_MS` | u64 | 0 | Quiet period before a pending edit is recorded (0 = record immediately) |

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default number of retained entries.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Smallest accepted depth.
pub const MIN_MAX_DEPTH: usize = 1;

/// Largest accepted depth.
pub const MAX_MAX_DEPTH: usize = 10_000;

/// Default coalescing window (disabled).
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 0;

/// Largest accepted coalescing window.
pub const MAX_COALESCE_WINDOW_MS: u64 = 10_000;

/// Tunables for one editor's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HistoryConfig {
    /// Maximum entries kept, including the floor. Default: 10.
    pub max_depth: usize,

    /// Quiet period used by [`CoalesceWindow`](crate::CoalesceWindow).
    /// Zero records every noted mutation immediately. Default: 0.
    pub coalesce_window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
        }
    }
}

impl HistoryConfig {
    /// Set the depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the coalescing window.
    #[must_use]
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The coalescing window as a [`Duration`].
    #[must_use]
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `FOLIO_HISTORY_MAX_DEPTH`: entries retained
    /// - `FOLIO_COALESCE_WINDOW_MS`: coalescing window in milliseconds
    ///
    /// Unparseable values are ignored; the rest are clamped.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FOLIO_HISTORY_MAX_DEPTH")
            && let Ok(depth) = val.parse::<usize>()
        {
            config.max_depth = depth;
        }

        if let Ok(val) = std::env::var("FOLIO_COALESCE_WINDOW_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.coalesce_window_ms = ms;
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// ```
    /// use folio_history::HistoryConfig;
    ///
    /// let config = HistoryConfig::default().with_max_depth(0).validated();
    /// assert_eq!(config.max_depth, 1);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_depth = self.max_depth.clamp(MIN_MAX_DEPTH, MAX_MAX_DEPTH);
        self.coalesce_window_ms = self.coalesce_window_ms.min(MAX_COALESCE_WINDOW_MS);
        self
    }

    /// Check if values are within valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&self.max_depth)
            && self.coalesce_window_ms <= MAX_COALESCE_WINDOW_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HistoryConfig::default();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.coalesce_window(), Duration::ZERO);
        assert!(config.is_valid());
    }

    #[test]
    fn validated_clamps() {
        let config = HistoryConfig::default()
            .with_max_depth(1_000_000)
            .with_coalesce_window(Duration::from_secs(60))
            .validated();
        assert_eq!(config.max_depth, MAX_MAX_DEPTH);
        assert_eq!(config.coalesce_window_ms, MAX_COALESCE_WINDOW_MS);
        assert!(config.is_valid());

        let config = HistoryConfig::default().with_max_depth(0);
        assert!(!config.is_valid());
        assert_eq!(config.validated().max_depth, 1);
    }

    #[test]
    fn builder_round_trips_window() {
        let config = HistoryConfig::default().with_coalesce_window(Duration::from_millis(300));
        assert_eq!(config.coalesce_window_ms, 300);
        assert_eq!(config.coalesce_window(), Duration::from_millis(300));
    }
}
