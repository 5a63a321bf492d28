//! Logging and timing facilities.
//!
//! This module provides:
//! - Target and span names used with the `tracing` crate
//! - [`Stopwatch`], a timer that logs its elapsed time when finished
//!
//! # Tracing Integration
//!
//! Nothing is printed unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("observable_range=trace")
//!         .init();
//! }
//! ```

use std::time::{Duration, Instant};

/// Span names used for tracing.
pub mod span_names {
    /// Notification dispatch span.
    pub const DISPATCH: &str = "observable_range::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "observable_range_core";
    /// Signal dispatch target.
    pub const SIGNAL: &str = "observable_range_core::signal";
    /// Ranged collection target.
    pub const COLLECTION: &str = "observable_range::collection";
    /// Stopwatch output target.
    pub const PERF: &str = "observable_range::perf";
}

/// Measures the time since it was started.
///
/// ```
/// use observable_range_core::Stopwatch;
///
/// let watch = Stopwatch::start();
/// // ... work ...
/// let elapsed = watch.finish("rebuild rows");
/// assert!(elapsed.as_secs() < 60);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start a new stopwatch.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the stopwatch, log the elapsed time under `label`, and return it.
    pub fn finish(self, label: &str) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            target: "observable_range::perf",
            label,
            elapsed_ms = elapsed.as_millis() as u64,
            "{label}:{}ms",
            elapsed.as_millis()
        );
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}
