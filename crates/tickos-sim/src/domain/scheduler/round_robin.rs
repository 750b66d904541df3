//! Round Robin
//!
//! FIFO order plus a positive time slice. The scheduler itself never
//! requeues anything: the kernel watches the running process's quantum,
//! and on expiry moves it back here through a context switch.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

use super::types::{ReadyEntry, SchedulerMetrics};
use super::Scheduler;
use crate::domain::process::Pid;

/// Quantum used when a caller asks for a zero-length slice.
const DEFAULT_QUANTUM: u32 = 4;

#[derive(Default)]
struct RoundRobinState {
    queue: VecDeque<Pid>,
    metrics: SchedulerMetrics,
}

/// Time-sliced FIFO scheduler.
pub struct RoundRobinScheduler {
    quantum: u32,
    state: Mutex<RoundRobinState>,
}

impl RoundRobinScheduler {
    /// Create a scheduler with the given quantum. A zero quantum falls
    /// back to the default of 4 ticks.
    pub fn new(quantum: u32) -> Self {
        Self {
            quantum: if quantum == 0 { DEFAULT_QUANTUM } else { quantum },
            state: Mutex::new(RoundRobinState::default()),
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn add(&self, entry: ReadyEntry) {
        let mut state = self.state.lock();
        state.queue.push_back(entry.pid);
        debug!(target: "sched", pid = %entry.pid, "rr: enqueued");
    }

    fn next(&self) -> Option<Pid> {
        let mut state = self.state.lock();
        let pid = state.queue.pop_front()?;
        state.metrics.record_selection(pid);
        debug!(target: "sched", %pid, quantum = self.quantum, "rr: selected");
        Some(pid)
    }

    fn has_ready(&self) -> bool {
        !self.state.lock().queue.is_empty()
    }

    fn time_slice(&self) -> Option<u32> {
        Some(self.quantum)
    }

    fn peek_ready(&self) -> Vec<Pid> {
        self.state.lock().queue.iter().copied().collect()
    }

    fn name(&self) -> String {
        format!("Round Robin (Q={})", self.quantum)
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.state.lock().metrics.clone()
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.queue.clear();
        state.metrics = SchedulerMetrics::default();
    }
}
