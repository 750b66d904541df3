//! Process Entity
//!
//! The Process Control Block, its lifecycle state machine, the burst
//! model, the deterministic page-reference string, and the per-process
//! worker thread. See [`pcb::Process`] for the rendezvous contract.

pub mod pcb;
pub mod reference;
pub mod types;

pub use pcb::Process;
pub use reference::LOCALITY_PROBABILITY;
pub use types::{
    Burst, BurstKind, PageNumber, Pid, ProcessDescriptor, ProcessError, ProcessSnapshot,
    ProcessState, ProcessStats,
};
