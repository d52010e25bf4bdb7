//! # Benchmark Engine Module
//!
//! This module contains the timing loop that drives every scenario and the
//! scenario adapters that decide which slice of the signal lifecycle is
//! measured.
//!
//! ## Timing Loop Protocol
//!
//! Each timed invocation starts with `elapsed = 0` and `count = 1`, then runs
//! repetitions until `elapsed` reaches the configured budget:
//!
//! 1. **Setup**: build whatever the scenario keeps outside the timer
//! 2. **Measure**: arm the timer, run the measured segment, read the timer
//! 3. **Teardown**: drop the repetition's subject and observers
//!
//! The repetition count starts at one so the rate is never computed from a
//! zero count, even when the first repetition alone exhausts the budget.
//!
//! ## Measured Windows
//!
//! | Scenario     | Setup (untimed)                  | Measured                      |
//! |--------------|----------------------------------|-------------------------------|
//! | construction | —                                | allocate subject + observers  |
//! | destruction  | shuffle, allocate, connect all   | drop subject + observers      |
//! | connection   | shuffle, allocate                | connect all                   |
//! | emission     | shuffle, allocate, connect all   | emit once                     |
//! | combined     | shuffle once, before the loop    | allocate, connect all, emit   |
//!
//! `validate` is untimed: it runs `N` repetitions of the combined cycle with a
//! fresh shuffle each time and returns the next value of the random stream.
//!
//! ## Ownership
//!
//! Every repetition owns its observer array and subject. The subject borrows
//! the observers, so it is always dropped first. The permutation buffer and
//! the random source belong to the invocation and are reused across
//! repetitions.

use crate::{
    cli::Scenario,
    metrics::Measurement,
    signal::{Observer, Signal},
    timer::{saturating_nanos, Timer},
    workload::{self, BenchRng},
};
use anyhow::Result;
use std::hint::black_box;
use std::time::Duration;
use tracing::{debug, info};

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    /// Throughput of a timed scenario
    Timed(Measurement),

    /// Checksum returned by `validate`
    Checksum(u64),
}

/// Benchmark harness that executes the signal scenarios
///
/// The harness owns the injected [`Timer`] for its whole lifetime. Each
/// scenario call is an independent invocation: a fresh random source is
/// seeded from `seed` and the sample accumulator starts from zero.
///
/// ## Usage Pattern
///
/// ```rust
/// use signal_benchmark::{ChronoTimer, Listener, SignalBenchmark};
/// use std::time::Duration;
///
/// let mut harness = SignalBenchmark::new(ChronoTimer::new(), Duration::from_micros(200), 5489);
/// let measurement = harness.emission::<Listener>(64);
/// assert!(measurement.repetitions >= 1);
/// assert_eq!(harness.validate::<Listener>(8), harness.validate::<Listener>(8));
/// ```
pub struct SignalBenchmark<T: Timer> {
    /// Elapsed-time source armed around each measured segment
    timer: T,

    /// Time budget per invocation, in nanoseconds
    limit_ns: u64,

    /// Seed for the workload and handler random source
    seed: u64,
}

impl<T: Timer> SignalBenchmark<T> {
    /// Create a new harness
    ///
    /// ## Parameters
    /// - `timer`: Elapsed-time source used by every timed scenario
    /// - `budget`: Time budget per invocation
    /// - `seed`: Seed shared by every invocation for reproducibility
    pub fn new(timer: T, budget: Duration, seed: u64) -> Self {
        Self {
            timer,
            limit_ns: saturating_nanos(budget),
            seed,
        }
    }

    /// Run `scenario` for `test_size` observers
    ///
    /// `Scenario::All` must be expanded by the caller.
    pub fn run<O: Observer + Default>(
        &mut self,
        scenario: Scenario,
        test_size: usize,
    ) -> Result<ScenarioOutcome> {
        let outcome = match scenario {
            Scenario::Construction => ScenarioOutcome::Timed(self.construction::<O>(test_size)),
            Scenario::Destruction => ScenarioOutcome::Timed(self.destruction::<O>(test_size)),
            Scenario::Connection => ScenarioOutcome::Timed(self.connection::<O>(test_size)),
            Scenario::Emission => ScenarioOutcome::Timed(self.emission::<O>(test_size)),
            Scenario::Combined => ScenarioOutcome::Timed(self.combined::<O>(test_size)),
            Scenario::Validate => ScenarioOutcome::Checksum(self.validate::<O>(test_size)),
            Scenario::All => anyhow::bail!("Scenario 'all' must be expanded before running"),
        };
        Ok(outcome)
    }

    /// Run untimed combined cycles to bring caches and the allocator to a
    /// steady state before measuring.
    pub fn warm_up<O: Observer + Default>(&self, test_size: usize, repetitions: usize) {
        if repetitions == 0 {
            return;
        }
        info!(
            "Running warmup with {} repetitions of {} observers",
            repetitions, test_size
        );

        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);
        for _ in 0..repetitions {
            workload::shuffle(&mut permutation, &mut rng);
            let observers = build_observers::<O>(test_size);
            let mut subject = Signal::new();
            connect_all(&mut subject, &observers, &permutation);
            subject.emit(&mut rng);
        }
        black_box(rng.sink());
    }

    /// Time allocating a subject and `test_size` observers
    pub fn construction<O: Observer + Default>(&mut self, test_size: usize) -> Measurement {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);

        self.timing_loop(
            Scenario::Construction,
            &mut rng,
            &mut permutation,
            move |timer, _, _| {
                timer.reset();
                let subject: Signal<'_, O> = Signal::new();
                let observers = build_observers::<O>(test_size);
                black_box((&subject, &observers));
                // Both are dropped after the reading.
                timer.count()
            },
        )
    }

    /// Time dropping a fully connected subject together with its observers
    pub fn destruction<O: Observer + Default>(&mut self, test_size: usize) -> Measurement {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);

        self.timing_loop(
            Scenario::Destruction,
            &mut rng,
            &mut permutation,
            move |timer, rng, permutation| {
                workload::shuffle(permutation, rng);
                let observers = build_observers::<O>(test_size);
                let mut subject = Signal::new();
                connect_all(&mut subject, &observers, permutation);

                timer.reset();
                drop(subject);
                drop(observers);
                timer.count()
            },
        )
    }

    /// Time connecting `test_size` observers in shuffled order
    pub fn connection<O: Observer + Default>(&mut self, test_size: usize) -> Measurement {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);

        self.timing_loop(
            Scenario::Connection,
            &mut rng,
            &mut permutation,
            move |timer, rng, permutation| {
                workload::shuffle(permutation, rng);
                let observers = build_observers::<O>(test_size);
                let mut subject = Signal::new();

                timer.reset();
                connect_all(&mut subject, &observers, permutation);
                timer.count()
            },
        )
    }

    /// Time one emission to `test_size` connected observers
    pub fn emission<O: Observer + Default>(&mut self, test_size: usize) -> Measurement {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);

        self.timing_loop(
            Scenario::Emission,
            &mut rng,
            &mut permutation,
            move |timer, rng, permutation| {
                workload::shuffle(permutation, rng);
                let observers = build_observers::<O>(test_size);
                let mut subject = Signal::new();
                connect_all(&mut subject, &observers, permutation);

                timer.reset();
                subject.emit(rng);
                timer.count()
            },
        )
    }

    /// Time allocation, connection and one emission as a single window
    ///
    /// The permutation is shuffled once up front and reused by every
    /// repetition.
    pub fn combined<O: Observer + Default>(&mut self, test_size: usize) -> Measurement {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);
        workload::shuffle(&mut permutation, &mut rng);

        self.timing_loop(
            Scenario::Combined,
            &mut rng,
            &mut permutation,
            move |timer, rng, permutation| {
                timer.reset();
                let observers = build_observers::<O>(test_size);
                let mut subject = Signal::new();
                connect_all(&mut subject, &observers, permutation);
                subject.emit(rng);
                timer.count()
            },
        )
    }

    /// Exercise connection and emission `test_size` times without timing
    ///
    /// Returns the next value of the random stream after the final emission.
    /// Handlers draw from the same stream as the shuffles, so a dropped or
    /// duplicated delivery shifts every later shuffle and changes the result.
    pub fn validate<O: Observer + Default>(&self, test_size: usize) -> u64 {
        let mut rng = BenchRng::seed_from_u64(self.seed);
        let mut permutation = workload::generate(test_size);

        for _ in 0..test_size {
            workload::shuffle(&mut permutation, &mut rng);
            let observers = build_observers::<O>(test_size);
            let mut subject = Signal::new();
            connect_all(&mut subject, &observers, &permutation);
            subject.emit(&mut rng);
        }

        black_box(rng.sink());
        let checksum = rand::RngCore::next_u64(&mut rng);
        debug!("validate({}) checksum = {:#018x}", test_size, checksum);
        checksum
    }

    /// Shared timing loop
    ///
    /// `repetition` performs one full build-measure-teardown cycle and returns
    /// the nanoseconds read from the armed timer. Readings are summed
    /// unrounded, so windows shorter than any display unit still count.
    fn timing_loop<F>(
        &mut self,
        scenario: Scenario,
        rng: &mut BenchRng,
        permutation: &mut [usize],
        mut repetition: F,
    ) -> Measurement
    where
        F: FnMut(&mut T, &mut BenchRng, &mut [usize]) -> u64,
    {
        let test_size = permutation.len();
        let limit_ns = self.limit_ns;
        let mut elapsed_ns: u64 = 0;
        let mut count: usize = 1;

        while elapsed_ns < limit_ns {
            let window_ns = repetition(&mut self.timer, &mut *rng, &mut *permutation);
            elapsed_ns = elapsed_ns.saturating_add(window_ns);
            count += 1;
        }
        black_box(rng.sink());

        let measurement = Measurement::new(scenario, test_size, count, elapsed_ns, limit_ns);
        debug!(
            "{}({}): {} repetitions, {}ns elapsed, rate {:.6}",
            scenario, test_size, count, elapsed_ns, measurement.rate
        );
        measurement
    }
}

/// Default-construct `test_size` observers
fn build_observers<O: Default>(test_size: usize) -> Vec<O> {
    (0..test_size).map(|_| O::default()).collect()
}

/// Connect `observers` to `subject` in `permutation` order
fn connect_all<'a, O: Observer>(
    subject: &mut Signal<'a, O>,
    observers: &'a [O],
    permutation: &[usize],
) {
    for &index in permutation {
        subject.connect(&observers[index]);
    }
}
