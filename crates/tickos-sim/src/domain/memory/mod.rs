//! Memory Manager Capability
//!
//! # Overview
//!
//! The kernel delegates paging to a pluggable [`MemoryManager`]. On every
//! CPU tick the running process asks for the page under its instruction
//! pointer; the manager answers [`PageRequest::Hit`] and execution
//! proceeds, or reports a fault and the kernel parks the process on the
//! disk-latency queue. The manager does not install the page at fault
//! time: the kernel calls [`MemoryManager::complete_page_load`] once the
//! penalty elapses.
//!
//! # Policies
//!
//! | Policy                   | Victim selection                          |
//! |--------------------------|-------------------------------------------|
//! | [`FifoMemoryManager`]    | page loaded longest ago                   |
//! | [`LruMemoryManager`]     | frame with the oldest access timestamp    |
//! | [`OptimalMemoryManager`] | page whose next use lies farthest ahead   |
//!
//! Optimal needs future knowledge: the kernel registers each process's
//! full reference string on arrival and advances a cursor after every
//! executed CPU tick so "next use" is measured from the process's actual
//! position.

mod fifo;
mod lru;
mod optimal;
mod pool;
mod types;

pub use fifo::FifoMemoryManager;
pub use lru::LruMemoryManager;
pub use optimal::OptimalMemoryManager;
pub use types::{
    Frame, FrameId, FrameSnapshot, MemoryStats, PageRequest, PageTable, PageTableEntry,
    PageTableEntrySnapshot,
};

use crate::domain::process::{PageNumber, Pid};

/// Paging policy of the simulated machine.
///
/// Implementations are thread-safe behind an internal lock. Requesting a
/// page for a process that was never allocated is a caller bug; it is
/// caught by a debug assertion.
pub trait MemoryManager: Send + Sync {
    /// Whether `(pid, page)` is resident. Read-only probe.
    fn is_page_loaded(&self, pid: Pid, page: PageNumber) -> bool;

    /// Resolve an access to `(pid, page)`, updating hit/fault accounting
    /// and any replacement bookkeeping.
    fn request_page(&self, pid: Pid, page: PageNumber) -> PageRequest;

    /// Finalise the load started by a previous fault, refreshing access
    /// timestamps of the now-resident page.
    fn complete_page_load(&self, pid: Pid, page: PageNumber);

    /// Create an empty page table for `pid` with `required_pages` absent
    /// entries.
    fn allocate_for_process(&self, pid: Pid, required_pages: usize);

    /// Release every frame `pid` owns, its page table, and any
    /// replacement bookkeeping that references it.
    fn free_for_process(&self, pid: Pid);

    /// Hand the policy a process's full future reference string. Only
    /// Optimal stores it.
    fn register_future_references(&self, _pid: Pid, _reference_string: &[PageNumber]) {}

    /// Advance the policy's view of a process's position in its reference
    /// string. Only Optimal reacts.
    fn advance_instruction_pointer(&self, _pid: Pid) {}

    /// Observer view of physical memory.
    fn frame_status(&self) -> Vec<FrameSnapshot>;

    /// Observer view of `pid`'s page table.
    fn page_table_for_process(&self, pid: Pid) -> Vec<PageTableEntrySnapshot>;

    /// Accumulated statistics.
    fn stats(&self) -> MemoryStats;

    /// Human-readable algorithm label.
    fn name(&self) -> String;

    /// Drop all frames, tables, bookkeeping, and statistics.
    fn reset(&self);
}
