//! # Utility Functions and Helper Module
//!
//! Helpers used by the benchmark driver: human-readable formatting of
//! durations and throughput figures, and pinning the benchmark thread to a
//! CPU core.
//!
//! ## Usage Examples
//!
//! ```rust
//! use signal_benchmark::utils::*;
//! use std::time::Duration;
//!
//! assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
//! assert_eq!(format_op_rate(2_300_000.0), "2.30M ops/s");
//! ```

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Format a duration in a human-readable way
///
/// Automatically selects the most appropriate unit based on magnitude:
///
/// - **Nanoseconds**: < 1,000 ns (e.g., "500ns")
/// - **Microseconds**: < 1,000,000 ns (e.g., "1.50μs")
/// - **Milliseconds**: < 1,000,000,000 ns (e.g., "25.75ms")
/// - **Seconds**: < 60 seconds (e.g., "5.25s")
/// - **Minutes and Hours**: For longer durations (e.g., "5m 30s", "2h 15m 30s")
///
/// ## Examples
///
/// ```rust
/// # use signal_benchmark::utils::format_duration;
/// # use std::time::Duration;
/// assert_eq!(format_duration(Duration::from_nanos(750)), "750ns");
/// assert_eq!(format_duration(Duration::from_nanos(1250)), "1.25μs");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ns = duration.as_nanos();

    if total_ns < 1_000 {
        format!("{}ns", total_ns)
    } else if total_ns < 1_000_000 {
        format!("{:.2}μs", total_ns as f64 / 1_000.0)
    } else if total_ns < 1_000_000_000 {
        format!("{:.2}ms", total_ns as f64 / 1_000_000.0)
    } else if total_ns < 60_000_000_000 {
        format!("{:.2}s", total_ns as f64 / 1_000_000_000.0)
    } else {
        let seconds = duration.as_secs();
        let minutes = seconds / 60;
        let remaining_seconds = seconds % 60;

        if minutes < 60 {
            format!("{}m {}s", minutes, remaining_seconds)
        } else {
            let hours = minutes / 60;
            let remaining_minutes = minutes % 60;
            format!("{}h {}m {}s", hours, remaining_minutes, remaining_seconds)
        }
    }
}

/// Format an operation rate using decimal scaling
///
/// - < 1,000 (e.g., "750 ops/s")
/// - Thousands: < 1,000,000 (e.g., "15.50K ops/s")
/// - Millions: < 1,000,000,000 (e.g., "2.30M ops/s")
/// - Billions beyond that (e.g., "1.20G ops/s")
pub fn format_op_rate(ops_per_second: f64) -> String {
    if ops_per_second < 1000.0 {
        format!("{:.0} ops/s", ops_per_second)
    } else if ops_per_second < 1_000_000.0 {
        format!("{:.2}K ops/s", ops_per_second / 1000.0)
    } else if ops_per_second < 1_000_000_000.0 {
        format!("{:.2}M ops/s", ops_per_second / 1_000_000.0)
    } else {
        format!("{:.2}G ops/s", ops_per_second / 1_000_000_000.0)
    }
}

/// Pin the calling thread to CPU core `core`
///
/// ## Errors
///
/// - The platform does not report its core ids
/// - `core` is not one of the reported ids
/// - The operating system refuses the affinity change
pub fn pin_current_thread(core: usize) -> Result<()> {
    let core_ids = core_affinity::get_core_ids()
        .context("Failed to query CPU core ids for affinity")?;
    let core_id = core_ids
        .into_iter()
        .find(|id| id.id == core)
        .with_context(|| format!("CPU core {} is not available", core))?;

    if !core_affinity::set_for_current(core_id) {
        anyhow::bail!("Failed to pin benchmark thread to CPU core {}", core);
    }
    debug!("Pinned benchmark thread to CPU core {}", core);
    Ok(())
}
