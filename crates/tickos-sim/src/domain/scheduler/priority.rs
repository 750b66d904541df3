//! Priority Scheduling
//!
//! Processes are keyed on their fixed priority, lower value first, with
//! FIFO order inside each priority band. The policy itself is
//! non-preemptive by timer; when a higher-priority process arrives, the
//! kernel preempts the CPU holder and lets this queue hand out the winner
//! on the next tick.

use std::collections::{BTreeMap, VecDeque};

use parking_lot::Mutex;
use tracing::debug;

use super::types::{ReadyEntry, SchedulerMetrics};
use super::Scheduler;
use crate::domain::process::Pid;

#[derive(Default)]
struct PriorityState {
    /// Priority band -> FIFO of pids. BTreeMap iteration order is the
    /// selection order.
    bands: BTreeMap<i32, VecDeque<Pid>>,
    metrics: SchedulerMetrics,
}

/// Per-priority FIFO scheduler.
#[derive(Default)]
pub struct PriorityScheduler {
    state: Mutex<PriorityState>,
}

impl PriorityScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for PriorityScheduler {
    fn add(&self, entry: ReadyEntry) {
        let mut state = self.state.lock();
        state
            .bands
            .entry(entry.priority)
            .or_default()
            .push_back(entry.pid);
        debug!(
            target: "sched",
            pid = %entry.pid,
            priority = entry.priority,
            "priority: enqueued",
        );
    }

    fn next(&self) -> Option<Pid> {
        let mut state = self.state.lock();
        let band = state
            .bands
            .iter()
            .find(|(_, q)| !q.is_empty())
            .map(|(&band, _)| band)?;

        let queue = state.bands.get_mut(&band)?;
        let pid = queue.pop_front()?;
        if queue.is_empty() {
            state.bands.remove(&band);
        }

        state.metrics.record_selection(pid);
        debug!(target: "sched", %pid, priority = band, "priority: selected");
        Some(pid)
    }

    fn has_ready(&self) -> bool {
        self.state.lock().bands.values().any(|q| !q.is_empty())
    }

    fn peek_ready(&self) -> Vec<Pid> {
        self.state
            .lock()
            .bands
            .values()
            .flat_map(|q| q.iter().copied())
            .collect()
    }

    fn name(&self) -> String {
        "Priority Scheduling".to_owned()
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.state.lock().metrics.clone()
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.bands.clear();
        state.metrics = SchedulerMetrics::default();
    }
}
