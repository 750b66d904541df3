//! Scheduler Capability
//!
//! # Overview
//!
//! The kernel delegates the "who runs next" decision to a pluggable
//! [`Scheduler`]. Queues hold [`ReadyEntry`] handles, never processes: the
//! kernel remains the single owner of every PCB and every handle resolves
//! against its process store until termination.
//!
//! # Policies
//!
//! | Policy                       | Ready structure                | Time slice |
//! |------------------------------|--------------------------------|------------|
//! | [`FcfsScheduler`]            | FIFO queue                     | none       |
//! | [`RoundRobinScheduler`]      | FIFO queue                     | quantum    |
//! | [`SjfScheduler`]             | min-heap on burst duration     | none       |
//! | [`PriorityScheduler`]        | per-priority FIFO bands        | none       |
//!
//! Round Robin does not requeue by itself: the kernel detects quantum
//! expiry and re-adds the process. Priority preemption on arrival is
//! likewise the kernel's job; the policy only orders the ready set.
//!
//! All implementations are thread-safe behind an internal lock so snapshot
//! readers can observe the ready queue while the kernel mutates it.

mod fcfs;
mod priority;
mod round_robin;
mod sjf;
mod types;

pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use types::{ReadyEntry, SchedulerMetrics};

use crate::domain::process::Pid;

/// CPU scheduling policy.
pub trait Scheduler: Send + Sync {
    /// Enqueue a ready process. Order within the same class is insertion
    /// order.
    fn add(&self, entry: ReadyEntry);

    /// Remove and return the next process to run, if any.
    fn next(&self) -> Option<Pid>;

    /// Whether any process is ready.
    fn has_ready(&self) -> bool;

    /// Quantum in ticks for time-sliced policies; `None` disables
    /// timer-based preemption entirely.
    fn time_slice(&self) -> Option<u32> {
        None
    }

    /// Read-only view of the ready queue in selection order. Does not
    /// mutate.
    fn peek_ready(&self) -> Vec<Pid>;

    /// Human-readable algorithm label.
    fn name(&self) -> String;

    /// Snapshot of scheduling decisions and per-pid selection counts.
    fn metrics(&self) -> SchedulerMetrics;

    /// Clear the ready queue and metrics, as on a fresh load.
    fn reset(&self);
}
