//! Domain Layer
//!
//! Pure simulation logic, one directory per component:
//!
//! ```text
//! clock/       monotonic tick counter + shared read-only handle
//! process/     PCB, burst model, reference string, worker thread
//! monitor      kernel <-> worker dispatch primitive
//! scheduler/   Scheduler capability + four policies
//! memory/      MemoryManager capability + three replacement policies
//! simulator/   the tick-loop kernel, config, metrics
//! ```
//!
//! Dependency order is leaves-first: `clock` and `process` have no internal
//! dependencies, schedulers and memory managers consume their types, and
//! `simulator` assembles everything.

pub mod clock;
pub mod memory;
pub mod monitor;
pub mod process;
pub mod scheduler;
pub mod simulator;

pub use clock::{ClockHandle, SimClock, Tick};
pub use monitor::CpuMonitor;
pub use process::{Pid, Process, ProcessDescriptor, ProcessState};
pub use scheduler::Scheduler;
pub use memory::MemoryManager;
pub use simulator::{Simulator, SimulatorConfig, SimulatorMetrics};
