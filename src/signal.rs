//! # Signal Dispatch
//!
//! The signal/observer mechanism under measurement. A [`Signal`] holds an
//! ordered list of connected observers and, on [`Signal::emit`], invokes every
//! connected handler exactly once in connection order.
//!
//! ## Ownership
//!
//! A signal borrows its observers for its whole lifetime. The borrow checker
//! therefore guarantees the signal is released before any observer it refers
//! to, so a signal can never dispatch into a destroyed observer.

use crate::workload::BenchRng;

/// Anything that can be connected to a [`Signal`].
pub trait Observer {
    /// Handle one emission. Implementations draw exactly one value from `rng`.
    fn on_signal(&self, rng: &mut BenchRng);
}

/// Default observer used by the benchmark scenarios.
///
/// The handler draws one value and touches no observer state.
#[derive(Debug, Default)]
pub struct Listener {
    // Non-zero size: every listener has its own address and heap slot.
    _slot: u64,
}

impl Observer for Listener {
    #[inline(never)]
    fn on_signal(&self, rng: &mut BenchRng) {
        rng.draw();
    }
}

/// Dispatch endpoint fanning one emission out to every connected observer.
pub struct Signal<'a, O: ?Sized> {
    slots: Vec<&'a O>,
}

impl<'a, O: Observer + ?Sized> Signal<'a, O> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Connect `observer`. Amortized O(1).
    pub fn connect(&mut self, observer: &'a O) {
        self.slots.push(observer);
    }

    /// Disconnect the first connection to `observer`, preserving the order of
    /// the remaining connections. Returns whether a connection was removed.
    ///
    /// Observers are matched by address, so instances of a zero-sized type
    /// are indistinguishable.
    pub fn disconnect(&mut self, observer: &O) -> bool {
        let target = observer as *const O as *const ();
        match self
            .slots
            .iter()
            .position(|slot| std::ptr::eq(*slot as *const O as *const (), target))
        {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Invoke every connected handler once, in connection order.
    pub fn emit(&self, rng: &mut BenchRng) {
        for observer in &self.slots {
            observer.on_signal(rng);
        }
    }
}

impl<'a, O: Observer + ?Sized> Default for Signal<'a, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Counts the emissions it has handled.
    #[derive(Default)]
    struct Tally {
        hits: Cell<u64>,
    }

    impl Observer for Tally {
        fn on_signal(&self, rng: &mut BenchRng) {
            rng.draw();
            self.hits.set(self.hits.get() + 1);
        }
    }

    struct Recorder<'log> {
        id: usize,
        log: &'log RefCell<Vec<usize>>,
    }

    impl Observer for Recorder<'_> {
        fn on_signal(&self, rng: &mut BenchRng) {
            rng.draw();
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn test_emit_follows_connection_order() {
        let log = RefCell::new(Vec::new());
        let observers: Vec<Recorder> = (0..4).map(|id| Recorder { id, log: &log }).collect();

        let mut signal = Signal::new();
        for index in [2, 0, 3, 1] {
            signal.connect(&observers[index]);
        }
        signal.emit(&mut BenchRng::seed_from_u64(0));

        assert_eq!(*log.borrow(), vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_emit_on_empty_signal() {
        let signal: Signal<Listener> = Signal::new();
        let mut rng = BenchRng::seed_from_u64(3);
        signal.emit(&mut rng);
        assert!(signal.is_empty());
        assert_eq!(rng.sink(), 0);
    }

    #[test]
    fn test_each_observer_hit_once_per_emit() {
        let tallies: Vec<Tally> = (0..16).map(|_| Tally::default()).collect();
        let mut signal = Signal::with_capacity(tallies.len());
        for tally in &tallies {
            signal.connect(tally);
        }

        let mut rng = BenchRng::seed_from_u64(11);
        signal.emit(&mut rng);
        signal.emit(&mut rng);

        assert_eq!(signal.len(), 16);
        assert!(tallies.iter().all(|t| t.hits.get() == 2));
    }

    #[test]
    fn test_listener_draws_once_per_emit() {
        let listeners: Vec<Listener> = (0..5).map(|_| Listener::default()).collect();
        let mut signal = Signal::new();
        for listener in &listeners {
            signal.connect(listener);
        }

        let mut rng = BenchRng::seed_from_u64(11);
        let mut reference = BenchRng::seed_from_u64(11);
        signal.emit(&mut rng);
        for _ in 0..5 {
            reference.draw();
        }
        assert_eq!(rng.sink(), reference.sink());
        assert_eq!(rng.draw(), reference.draw());
    }

    #[test]
    fn test_disconnect() {
        let tallies: Vec<Tally> = (0..3).map(|_| Tally::default()).collect();
        let mut signal = Signal::new();
        for tally in &tallies {
            signal.connect(tally);
        }

        assert!(signal.disconnect(&tallies[1]));
        assert!(!signal.disconnect(&tallies[1]));
        signal.emit(&mut BenchRng::seed_from_u64(5));
        assert_eq!(
            tallies.iter().map(|t| t.hits.get()).collect::<Vec<_>>(),
            vec![1, 0, 1]
        );

        signal.disconnect_all();
        assert!(signal.is_empty());
    }

    #[test]
    fn test_dyn_observers() {
        let log = RefCell::new(Vec::new());
        let recorder = Recorder { id: 9, log: &log };
        let tally = Tally::default();

        let mut signal: Signal<dyn Observer + '_> = Signal::new();
        signal.connect(&recorder);
        signal.connect(&tally);
        signal.emit(&mut BenchRng::seed_from_u64(2));

        assert_eq!(*log.borrow(), vec![9]);
        assert_eq!(tally.hits.get(), 1);
    }
}
