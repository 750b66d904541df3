//! Simulator Metrics
//!
//! Global observables, recomputed in full once per tick. The process count
//! is small, so a full pass is cheaper than keeping incremental averages
//! honest.

use serde::Serialize;

use crate::domain::clock::Tick;

/// Snapshot of the simulation's global metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulatorMetrics {
    /// Tick the snapshot was computed at.
    pub current_tick: Tick,
    /// Mean ready-queue wait over completed processes.
    pub avg_wait_time: f64,
    /// Mean `finish - arrival` over completed processes.
    pub avg_turnaround_time: f64,
    /// Fraction of elapsed ticks on which a worker advanced one tick of
    /// CPU burst, in `[0, 1]`. Context-switch overhead and idle ticks do
    /// not count.
    pub cpu_utilization: f64,
    /// Preemptive context switches charged so far.
    pub total_context_switches: u64,
    /// Page faults across all processes.
    pub total_page_faults: u64,
    /// Processes in the terminated state.
    pub completed_processes: usize,
    /// Processes loaded into the simulation.
    pub total_processes: usize,
}
