//! Progress tracking for long-running streaming passes.
//!
//! The engine is strictly single-pass, so the tracker is a plain counter
//! that logs whenever the running count crosses an interval boundary.

use log::info;

use crate::logging::format_count;

/// Logs progress at regular count intervals during a streaming pass.
///
/// # Example
/// ```
/// use pairec_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Processed records").with_interval(100);
/// for _ in 0..250 {
///     tracker.inc(1); // Logs at 100 and 200
/// }
/// tracker.log_final(); // Logs "Processed records 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// Progress is logged each time the count crosses a multiple of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Items seen so far.
    count: u64,
}

impl ProgressTracker {
    /// Create a tracker with a default interval of 1,000,000 records.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: 0 }
    }

    /// Set the logging interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Add to the count, logging once for every interval boundary crossed.
    pub fn inc(&mut self, additional: u64) {
        let prev = self.count;
        self.count += additional;
        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, format_count(i * self.interval));
        }
    }

    /// Log the final count unless the last `inc` already landed exactly on
    /// an interval boundary.
    pub fn log_final(&self) {
        if self.count > 0 && self.count % self.interval != 0 {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
