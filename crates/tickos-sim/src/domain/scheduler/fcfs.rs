//! First-Come, First-Served
//!
//! The simplest policy: a FIFO queue, no timer preemption. A process runs
//! until it yields the CPU by itself (burst completion, I/O, page fault).

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

use super::types::{ReadyEntry, SchedulerMetrics};
use super::Scheduler;
use crate::domain::process::Pid;

#[derive(Default)]
struct FcfsState {
    queue: VecDeque<Pid>,
    metrics: SchedulerMetrics,
}

/// FIFO scheduler without a time slice.
#[derive(Default)]
pub struct FcfsScheduler {
    state: Mutex<FcfsState>,
}

impl FcfsScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FcfsScheduler {
    fn add(&self, entry: ReadyEntry) {
        let mut state = self.state.lock();
        state.queue.push_back(entry.pid);
        debug!(target: "sched", pid = %entry.pid, "fcfs: enqueued");
    }

    fn next(&self) -> Option<Pid> {
        let mut state = self.state.lock();
        let pid = state.queue.pop_front()?;
        state.metrics.record_selection(pid);
        debug!(target: "sched", %pid, "fcfs: selected");
        Some(pid)
    }

    fn has_ready(&self) -> bool {
        !self.state.lock().queue.is_empty()
    }

    fn peek_ready(&self) -> Vec<Pid> {
        self.state.lock().queue.iter().copied().collect()
    }

    fn name(&self) -> String {
        "FCFS (First-Come, First-Served)".to_owned()
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
