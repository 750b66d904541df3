//! Scheduler Types

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::process::Pid;

/// Handle to a ready process, carrying the keys the policies order by.
///
/// Built by the kernel from its process store at enqueue time. A ready
/// process's current burst cannot change while it sits in the queue
/// (bursts only move while running or blocked), so capturing
/// `burst_remaining` here is equivalent to reading it at selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyEntry {
    /// The process this entry refers to.
    pub pid: Pid,
    /// Scheduling priority. Lower value means higher priority.
    pub priority: i32,
    /// Remaining duration of the process's current burst.
    pub burst_remaining: u32,
}

/// Snapshot of a scheduler's decision history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerMetrics {
    /// Times `next()` handed out a process.
    pub decisions: u64,
    /// How often each pid was selected to run.
    pub selection_count: BTreeMap<Pid, u64>,
}

impl SchedulerMetrics {
    /// Record one selection.
    pub(crate) fn record_selection(&mut self, pid: Pid) {
        self.decisions += 1;
        *self.selection_count.entry(pid).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_counting() {
        let mut metrics = SchedulerMetrics::default();
        metrics.record_selection(Pid::new(1));
        metrics.record_selection(Pid::new(1));
        metrics.record_selection(Pid::new(2));

        assert_eq!(metrics.decisions, 3);
        assert_eq!(metrics.selection_count[&Pid::new(1)], 2);
        assert_eq!(metrics.selection_count[&Pid::new(2)], 1);
    }
}
