//! Tickos Simulation Kernel
//!
//! # Overview
//!
//! `tickos-sim` is a deterministic, discrete-event operating-system
//! simulator. A single kernel loop advances a global tick counter and, at
//! every tick, decides which process holds the CPU, which memory operations
//! are in flight, and how state changes accumulate into observable metrics.
//!
//! The crate is organised in two layers:
//!
//! - **Domain**: the simulation kernel, the process entity with its worker
//!   thread, the pluggable CPU schedulers, the pluggable paging memory
//!   managers, and the clock.
//! - **Infrastructure**: boundary concerns, currently the process-definition
//!   file parser.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Simulator                             │
//! │  owns: process store, blocked queue, memory-wait queue,     │
//! │        metrics accumulators, SimClock                       │
//! ├──────────────┬───────────────────────┬──────────────────────┤
//! │  Scheduler   │     MemoryManager     │   Process (PCB)      │
//! │  (capability)│     (capability)      │   + worker thread    │
//! │  FCFS        │     FIFO              │   rendezvous via     │
//! │  Round Robin │     LRU               │   Mutex + 2 Condvars │
//! │  SJF         │     Optimal           │                      │
//! │  Priority    │                       │                      │
//! └──────────────┴───────────────────────┴──────────────────────┘
//! ```
//!
//! # Determinism Laws
//!
//! The simulator enforces these invariants after every tick:
//!
//! - **Time monotonicity**: the clock never decreases.
//! - **Single CPU holder**: at most one process is `Running`.
//! - **State partition**: every loaded process is in exactly one of
//!   incoming, ready, blocked, memory-wait, running, or terminated.
//! - **Reproducibility**: a process's page-reference string is a pure
//!   function of its pid, so identical inputs produce identical runs.
//!
//! # Usage
//!
//! ```rust
//! use tickos_sim::domain::memory::FifoMemoryManager;
//! use tickos_sim::domain::scheduler::FcfsScheduler;
//! use tickos_sim::domain::simulator::{Simulator, SimulatorConfig};
//! use tickos_sim::infrastructure::parser;
//!
//! let descriptors = parser::parse_str("P1 0 CPU(3) 1 2\nP2 1 CPU(2) 1 2\n");
//!
//! let mut sim = Simulator::new(SimulatorConfig::default());
//! sim.load_processes(descriptors);
//! sim.set_scheduler(Box::new(FcfsScheduler::new()));
//! sim.set_memory_manager(Box::new(FifoMemoryManager::new(4, sim.clock_handle())));
//!
//! sim.start().unwrap();
//! while sim.metrics().completed_processes < sim.metrics().total_processes {
//!     sim.tick(false);
//! }
//! assert_eq!(sim.metrics().completed_processes, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod infrastructure;

// Re-export the primary surface so callers rarely need deep paths.
pub use domain::clock::{ClockHandle, SimClock, Tick};
pub use domain::process::{
    Burst, BurstKind, PageNumber, Pid, ProcessDescriptor, ProcessSnapshot, ProcessState,
    ProcessStats,
};
pub use domain::scheduler::{ReadyEntry, Scheduler, SchedulerMetrics};
pub use domain::memory::{
    FrameId, FrameSnapshot, MemoryManager, MemoryStats, PageRequest, PageTableEntrySnapshot,
};
pub use domain::simulator::{
    ConfigurationError, MemoryWaitSnapshot, Simulator, SimulatorConfig, SimulatorMetrics,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
