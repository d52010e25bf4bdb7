//! # Benchmark Timer
//!
//! The timing loop never reads a clock directly. It is handed a [`Timer`]
//! for the duration of one invocation and only ever calls `reset` to arm it
//! and `count` to read the nanoseconds elapsed since the last reset.
//!
//! Readings are always taken at nanosecond resolution. [`TimeUnit`] only
//! describes how a budget is written on the command line or in a config
//! file; it is converted to a [`Duration`] once, before any timing starts.
//!
//! [`ChronoTimer`] is the wall-clock implementation backed by
//! [`std::time::Instant`]. Tests substitute deterministic timers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Elapsed-time source injected into the timing loop.
pub trait Timer {
    /// Arm the timer, restarting the count from zero.
    fn reset(&mut self);

    /// Nanoseconds elapsed since the last [`Timer::reset`].
    fn count(&self) -> u64;
}

/// Unit a time budget is expressed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum TimeUnit {
    #[clap(name = "ns")]
    #[serde(rename = "ns")]
    Nanoseconds,
    #[clap(name = "us")]
    #[serde(rename = "us")]
    Microseconds,
    #[clap(name = "ms")]
    #[serde(rename = "ms")]
    Milliseconds,
}

impl TimeUnit {
    /// Length of `amount` units.
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(amount),
            TimeUnit::Microseconds => Duration::from_micros(amount),
            TimeUnit::Milliseconds => Duration::from_millis(amount),
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Nanoseconds => write!(f, "ns"),
            TimeUnit::Microseconds => write!(f, "μs"),
            TimeUnit::Milliseconds => write!(f, "ms"),
        }
    }
}

/// Whole nanoseconds in `duration`, saturating at `u64::MAX` (about 584 years).
pub fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Monotonic wall-clock timer.
#[derive(Debug, Clone)]
pub struct ChronoTimer {
    start: Instant,
}

impl ChronoTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ChronoTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ChronoTimer {
    #[inline]
    fn reset(&mut self) {
        self.start = Instant::now();
    }

    #[inline]
    fn count(&self) -> u64 {
        saturating_nanos(self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_to_duration() {
        assert_eq!(TimeUnit::Nanoseconds.to_duration(1500), Duration::from_nanos(1500));
        assert_eq!(TimeUnit::Microseconds.to_duration(1500), Duration::from_micros(1500));
        assert_eq!(TimeUnit::Milliseconds.to_duration(1500), Duration::from_millis(1500));
        assert_eq!(
            TimeUnit::Nanoseconds.to_duration(200_000),
            TimeUnit::Microseconds.to_duration(200)
        );
    }

    #[test]
    fn test_saturating_nanos() {
        assert_eq!(saturating_nanos(Duration::from_micros(2_500)), 2_500_000);
        assert_eq!(saturating_nanos(Duration::from_nanos(1)), 1);
        assert_eq!(saturating_nanos(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_chrono_timer_is_monotonic() {
        let mut timer = ChronoTimer::new();
        timer.reset();
        let first = timer.count();
        std::thread::sleep(Duration::from_millis(2));
        let second = timer.count();
        assert!(second >= first);
        assert!(second >= 2_000_000);

        timer.reset();
        assert!(timer.count() < second);
    }
}
