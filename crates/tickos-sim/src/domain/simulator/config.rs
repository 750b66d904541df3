//! Simulator Configuration

use serde::Serialize;

/// Tunable constants of the kernel.
///
/// The defaults are normative for determinism: two runs with the same
/// inputs and the same config produce the same timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulatorConfig {
    /// Disk-latency ticks a process waits after a page fault.
    pub page_fault_penalty: u32,
    /// Ticks the CPU spends on a preemptive context switch. Dispatching
    /// onto an idle CPU or after a termination is free.
    pub context_switch_overhead: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            page_fault_penalty: 5,
            context_switch_overhead: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normative_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.page_fault_penalty, 5);
        assert_eq!(config.context_switch_overhead, 1);
    }
}
