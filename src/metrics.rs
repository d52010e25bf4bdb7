//! # Throughput Metrics
//!
//! Turns the sample accumulator of one timed invocation into a single
//! throughput figure.
//!
//! ## Normalization
//!
//! ```text
//! rate = (test_size * repetitions) / limit_ns
//! ```
//!
//! The denominator is the configured budget, never the measured total. The
//! last repetition usually overshoots the budget, and that overshoot is
//! deliberately not corrected for. Both budget and elapsed time are held in
//! nanoseconds, so `rate` is observers processed per nanosecond whatever
//! unit the budget was written in.

use crate::cli::Scenario;
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Throughput of one benchmark invocation.
///
/// `repetitions` starts at one, so it is one more than the number of
/// repetitions that actually ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub scenario: Scenario,
    pub test_size: usize,
    pub repetitions: usize,
    /// Sum of the measured windows
    pub elapsed_ns: u64,
    /// Budget the loop ran against
    pub limit_ns: u64,
    /// Observers per nanosecond
    pub rate: f64,
}

impl Measurement {
    pub fn new(
        scenario: Scenario,
        test_size: usize,
        repetitions: usize,
        elapsed_ns: u64,
        limit_ns: u64,
    ) -> Self {
        Self {
            scenario,
            test_size,
            repetitions,
            elapsed_ns,
            limit_ns,
            rate: rate(test_size, limit_ns, repetitions),
        }
    }

    /// Observers processed per second.
    pub fn ops_per_second(&self) -> f64 {
        self.rate * NANOS_PER_SECOND
    }
}

/// Normalize a run to work items per budget unit: `(test_size * count) / limit`.
pub fn rate(test_size: usize, limit: u64, count: usize) -> f64 {
    (test_size as f64 * count as f64) / limit as f64
}
