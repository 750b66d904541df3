//! CPU Monitor
//!
//! Thin dispatch primitive between the kernel and a process's worker
//! thread. It centralises who may use the CPU: the kernel authorises one
//! tick of work and then blocks until that worker reports completion. The
//! monitor holds no state of its own; it is an adapter over the process's
//! condition variables, and it never juggles more than one worker per
//! tick.

use crate::domain::process::Process;

/// Single-CPU dispatch barrier.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuMonitor;

impl CpuMonitor {
    /// Create a monitor.
    pub const fn new() -> Self {
        Self
    }

    /// Authorise `process` to execute one CPU tick.
    pub fn dispatch(&self, process: &Process) {
        process.signal_run();
    }

    /// Block until `process` finishes the tick it was dispatched for.
    ///
    /// Acts as the synchronisation barrier that keeps progress
    /// deterministic step by step.
    pub fn wait_for_burst_completion(&self, process: &Process) {
        process.wait_for_tick_completion();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::process::{Burst, BurstKind, Pid, ProcessDescriptor};

    #[test]
    fn test_monitor_round_trip() {
        let mut p = Process::new(ProcessDescriptor {
            pid: Pid::new(1),
            arrival_time: 0,
            priority: 1,
            required_pages: 2,
            bursts: vec![Burst::new(BurstKind::Cpu, 2).unwrap()],
        })
        .unwrap();
        p.start_worker();

        let monitor = CpuMonitor::new();
        monitor.dispatch(&p);
        monitor.wait_for_burst_completion(&p);

        assert_eq!(p.current_burst_remaining(), 1);
        p.stop_worker();
    }
}
