//! Shortest Job First
//!
//! Non-preemptive by time: selection favours the process whose current
//! burst is shortest, with insertion order breaking ties. The ready set is
//! a min-heap keyed on `(burst_remaining, seq)`, which gives O(log n)
//! enqueue and selection.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tracing::debug;

use super::types::{ReadyEntry, SchedulerMetrics};
use super::Scheduler;
use crate::domain::process::Pid;

/// Heap key: burst length first, then arrival order into the queue. The
/// pid rides along for extraction.
type SjfKey = Reverse<(u32, u64, Pid)>;

#[derive(Default)]
struct SjfState {
    heap: BinaryHeap<SjfKey>,
    next_seq: u64,
    metrics: SchedulerMetrics,
}

/// Min-heap scheduler on current burst duration.
#[derive(Default)]
pub struct SjfScheduler {
    state: Mutex<SjfState>,
}

impl SjfScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for SjfScheduler {
    fn add(&self, entry: ReadyEntry) {
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .heap
            .push(Reverse((entry.burst_remaining, seq, entry.pid)));
        debug!(
            target: "sched",
            pid = %entry.pid,
            burst = entry.burst_remaining,
            "sjf: enqueued",
        );
    }

    fn next(&self) -> Option<Pid> {
        let mut state = self.state.lock();
        let Reverse((burst, _, pid)) = state.heap.pop()?;
        state.metrics.record_selection(pid);
        debug!(target: "sched", %pid, burst, "sjf: selected shortest");
        Some(pid)
    }

    fn has_ready(&self) -> bool {
        !self.state.lock().heap.is_empty()
    }

    fn peek_ready(&self) -> Vec<Pid> {
        // BinaryHeap iteration is unordered; drain a clone to present the
        // queue in selection order.
        let mut copy = self.state.lock().heap.clone();
        let mut result = Vec::with_capacity(copy.len());
        while let Some(Reverse((_, _, pid))) = copy.pop() {
            result.push(pid);
        }
        result
    }

    fn name(&self) -> String {
        "SJF (Shortest Job First)".to_owned()
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.state.lock().metrics.clone()
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.heap.clear();
        state.next_seq = 0;
        state.metrics = SchedulerMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pid: u32, burst: u32) -> ReadyEntry {
        ReadyEntry {
            pid: Pid::new(pid),
            priority: 1,
            burst_remaining: burst,
        }
    }

    #[test]
    fn test_shortest_first() {
        let sched = SjfScheduler::new();
        sched.add(entry(1, 9));
        sched.add(entry(2, 3));
        sched.add(entry(3, 6));

        assert_eq!(sched.next(), Some(Pid::new(2)));
        assert_eq!(sched.next(), Some(Pid::new(3)));
        assert_eq!(sched.next(), Some(Pid::new(1)));
    }

    #[test]
    fn test_tie_breaks_by_insertion_order() {
        let sched = SjfScheduler::new();
        sched.add(entry(5, 4));
        sched.add(entry(2, 4));
        sched.add(entry(9, 4));

        assert_eq!(sched.next(), Some(Pid::new(5)));
        assert_eq!(sched.next(), Some(Pid::new(2)));
        assert_eq!(sched.next(), Some(Pid::new(9)));
    }

    #[test]
    fn test_peek_in_selection_order() {
        let sched = SjfScheduler::new();
        sched.add(entry(1, 8));
        sched.add(entry(2, 1));

        assert_eq!(sched.peek_ready(), vec![Pid::new(2), Pid::new(1)]);
        // Peeking leaves the heap intact.
        assert_eq!(sched.next(), Some(Pid::new(2)));
    }

    #[test]
    fn test_no_time_slice() {
        assert_eq!(SjfScheduler::new().time_slice(), None);
    }
}
