//! Simulation Clock
//!
//! # Overview
//!
//! A single monotonically non-decreasing tick counter owned by the kernel.
//! Components that need to timestamp events (notably the memory managers,
//! which use it for load and access ordering) hold a [`ClockHandle`], a
//! cheaply-cloned read-only view of the same counter.
//!
//! The counter is only ever advanced by the kernel tick loop; the handle
//! exists so sub-components can observe time without being able to move it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Simulated time, measured in ticks since the start of the run.
pub type Tick = u64;

/// The kernel-owned simulation clock.
///
/// # Invariants
///
/// - Time never decreases except through [`SimClock::reset`].
/// - Only the kernel tick loop calls [`SimClock::tick`].
#[derive(Debug, Default)]
pub struct SimClock {
    ticks: Arc<AtomicU64>,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulation by one tick.
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Current simulation time.
    #[inline]
    pub fn now(&self) -> Tick {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Rewind to tick 0.
    pub fn reset(&self) {
        self.ticks.store(0, Ordering::Relaxed);
    }

    /// A read-only handle onto this clock's counter.
    pub fn handle(&self) -> ClockHandle {
        ClockHandle {
            ticks: Arc::clone(&self.ticks),
        }
    }
}

/// Read-only view of the simulation clock.
///
/// Handed to memory managers as their time source. Cloning is cheap; all
/// clones observe the same counter.
#[derive(Debug, Clone)]
pub struct ClockHandle {
    ticks: Arc<AtomicU64>,
}

impl ClockHandle {
    /// Current simulation time.
    #[inline]
    pub fn now(&self) -> Tick {
        self.ticks.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let clock = SimClock::new();
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn test_tick_advances() {
        let clock = SimClock::new();
        clock.tick();
        clock.tick();
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn test_handle_observes_owner() {
        let clock = SimClock::new();
        let handle = clock.handle();
        assert_eq!(handle.now(), 0);

        clock.tick();
        assert_eq!(handle.now(), 1);

        // Clones of the handle track the same counter.
        let second = handle.clone();
        clock.tick();
        assert_eq!(second.now(), 2);
        assert_eq!(handle.now(), 2);
    }

    #[test]
    fn test_reset_rewinds() {
        let clock = SimClock::new();
        for _ in 0..5 {
            clock.tick();
        }
        clock.reset();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.handle().now(), 0);
    }
}
