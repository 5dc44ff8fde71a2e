//! Formatting helpers for run summaries.

use std::time::{Duration, Instant};

/// Formats a count with thousands separators (e.g., `1,234,567`).
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction (0.0-1.0) as a percentage with the given decimal places.
#[must_use]
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", fraction * 100.0, decimals = decimals)
}

/// Formats a duration as the two most significant of hours, minutes, and
/// seconds (e.g., "45s", "2m 15s", "1h 30m").
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    match (hours, mins, secs) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, 0, _) => format!("{h}h"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

/// Formats a throughput figure as records per second.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let elapsed = duration.as_secs_f64();
    if elapsed <= f64::EPSILON {
        return format!("{} records/s", format_count(count));
    }
    let per_second = count as f64 / elapsed;
    if per_second >= 1.0 {
        format!("{} records/s", format_count(per_second as u64))
    } else {
        format!("{:.1} records/min", per_second * 60.0)
    }
}

/// Logs a start line on construction and a timing summary on completion.
pub struct OperationTimer {
    label: String,
    started: Instant,
}

impl OperationTimer {
    /// Starts the timer and logs the operation name.
    #[must_use]
    pub fn new(label: &str) -> Self {
        log::info!("{label} ...");
        Self { label: label.to_string(), started: Instant::now() }
    }

    /// Logs the completed operation with count, elapsed time, and rate.
    pub fn log_completion(&self, count: u64) {
        let elapsed = self.started.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.label,
            format_count(count),
            format_duration(elapsed),
            format_rate(count, elapsed)
        );
    }
}
