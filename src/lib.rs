//! # Signal Benchmark Library
//!
//! A micro-benchmark harness measuring the cost of signal/observer dispatch
//! across its lifecycle: building a subject with its observers, tearing it
//! down, connecting observers, emitting a signal, and all of those combined.
//!
//! ## Scenarios
//!
//! - **construction**: allocate a subject and N observers
//! - **destruction**: drop a fully connected subject and its observers
//! - **connection**: connect N observers in shuffled order
//! - **emission**: emit one signal to N connected observers
//! - **combined**: allocate, connect and emit in a single timed window
//! - **validate**: untimed determinism check returning a checksum
//!
//! Every timed scenario reports one throughput figure, `(N * count) / limit`,
//! where `count` is how many repetitions fit in the time budget `limit`.
//! Timing is accumulated in nanoseconds whatever unit the budget is given in.
//!
//! ## Architecture Overview
//!
//! - `benchmark`: timing loop and scenario adapters
//! - `signal`: the dispatch mechanism under test
//! - `workload`: shuffled observer orderings and the shared random source
//! - `timer`: the injected elapsed-time source
//! - `metrics`: throughput normalization
//! - `cli`: argument parsing and harness configuration
//! - `logging`: tracing output formatting
//! - `utils`: formatting and CPU pinning helpers
//!
//! ## Usage Example
//!
//! ```rust
//! use signal_benchmark::{ChronoTimer, Listener, SignalBenchmark, TimeUnit};
//!
//! let budget = TimeUnit::Microseconds.to_duration(100);
//! let mut harness = SignalBenchmark::new(ChronoTimer::new(), budget, signal_benchmark::defaults::SEED);
//!
//! let measurement = harness.connection::<Listener>(128);
//! println!("{:.0} observers/s", measurement.ops_per_second());
//! ```

/// Timing loop and scenario adapters
///
/// Contains `SignalBenchmark`, which owns the injected timer and runs each
/// scenario against a fresh random source and sample accumulator.
pub mod benchmark;

/// Command-line interface and configuration
///
/// Provides argument parsing using clap, JSON configuration files, and the
/// `Scenario` enumeration with its "all" expansion.
pub mod cli;

/// Tracing subscriber setup and the event formatter
pub mod logging;

/// Throughput normalization
pub mod metrics;

/// Signal/observer dispatch
///
/// `Signal` connects observers implementing the `Observer` trait and invokes
/// each of them once per emission, in connection order.
pub mod signal;

pub mod timer;

pub mod utils;

/// Observer orderings and the shared pseudo-random source
pub mod workload;

pub use benchmark::{ScenarioOutcome, SignalBenchmark};
pub use cli::{Args, HarnessConfig, Scenario};
pub use metrics::Measurement;
pub use signal::{Listener, Observer, Signal};
pub use timer::{ChronoTimer, TimeUnit, Timer};
pub use workload::BenchRng;

/// The current version of the signal benchmark
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    use crate::timer::TimeUnit;

    /// Default time budget per scenario invocation, in `TIME_UNIT`
    ///
    /// 50ms is long enough for thousands of repetitions at small test sizes
    /// while keeping a full sweep over every scenario and size short.
    pub const LIMIT: u64 = 50_000_000;

    /// Default unit of the time budget
    pub const TIME_UNIT: TimeUnit = TimeUnit::Nanoseconds;

    /// Default seed for the workload and handler random source
    ///
    /// Any fixed value works; what matters is that comparable runs share it.
    pub const SEED: u64 = 5489;

    /// Default observer counts per repetition
    pub const TEST_SIZES: [usize; 4] = [8, 64, 512, 4096];

    /// Default number of untimed warmup repetitions per test size
    pub const WARMUP_REPETITIONS: usize = 100;
}
