//! Memory Types
//!
//! Physical frames, page-table entries, and the plain-data snapshots the
//! memory managers expose to observers.
//!
//! # Invariants
//!
//! - A page-table entry holding a frame number points at exactly one frame
//!   whose `(owner, page)` pair matches.
//! - The set of occupied frames is exactly the set of present page-table
//!   entries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::clock::Tick;
use crate::domain::process::{PageNumber, Pid};

/// Index of a physical frame.
pub type FrameId = usize;

/// Outcome of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageRequest {
    /// The page was resident; execution proceeds this tick.
    Hit,
    /// The page was absent and a free frame received it. The requester
    /// still pays the disk-load penalty.
    Fault,
    /// The page was absent and a victim frame had to be evicted first.
    Replacement,
}

impl PageRequest {
    /// Whether the request found the page resident.
    #[inline]
    pub const fn is_hit(self) -> bool {
        matches!(self, PageRequest::Hit)
    }
}

/// A frame of simulated physical memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame {
    /// Owning `(pid, page)` pair, or `None` while free.
    pub owner: Option<(Pid, PageNumber)>,
    /// Tick the current page was loaded.
    pub load_tick: Tick,
    /// Tick of the most recent access.
    pub last_access_tick: Tick,
}

impl Frame {
    /// Whether the frame is free.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Install a page into this frame.
    pub fn occupy(&mut self, pid: Pid, page: PageNumber, now: Tick) {
        self.owner = Some((pid, page));
        self.load_tick = now;
        self.last_access_tick = now;
    }

    /// Return the frame to its free state.
    pub fn release(&mut self) {
        *self = Frame::default();
    }
}

/// One entry of a process's page table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTableEntry {
    /// Physical frame holding the page, or `None` while not present.
    pub frame: Option<FrameId>,
    /// Tick of the most recent access.
    pub last_access: Tick,
    /// Referenced bit.
    pub referenced: bool,
    /// Modified / dirty bit.
    pub modified: bool,
}

impl PageTableEntry {
    /// Whether the page is resident.
    #[inline]
    pub fn present(&self) -> bool {
        self.frame.is_some()
    }

    /// Mark the page loaded into `frame`.
    pub fn load(&mut self, frame: FrameId, now: Tick) {
        self.frame = Some(frame);
        self.last_access = now;
        self.referenced = true;
    }

    /// Mark the page evicted.
    pub fn evict(&mut self) {
        self.frame = None;
        self.referenced = false;
    }
}

/// Per-process page table: logical page number to entry.
pub type PageTable = BTreeMap<PageNumber, PageTableEntry>;

/// Observer view of one physical frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Frame index.
    pub frame_id: FrameId,
    /// Whether the frame currently holds a page.
    pub occupied: bool,
    /// Owning pid while occupied.
    pub owner_pid: Option<Pid>,
    /// Loaded page number while occupied.
    pub page_number: Option<PageNumber>,
    /// Tick the page was loaded.
    pub loaded_at_tick: Tick,
    /// Tick of the most recent access.
    pub last_access_tick: Tick,
}

/// Observer view of one page-table entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTableEntrySnapshot {
    /// Logical page number.
    pub page_number: PageNumber,
    /// Physical frame while present.
    pub frame_number: Option<FrameId>,
    /// Present bit.
    pub present: bool,
    /// Referenced bit.
    pub referenced: bool,
    /// Modified bit.
    pub modified: bool,
}

/// Accumulated memory-manager statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryStats {
    /// Frames in simulated physical memory.
    pub total_frames: usize,
    /// Frames currently occupied.
    pub used_frames: usize,
    /// Page faults since start, replacements included.
    pub total_page_faults: u64,
    /// Replacements performed.
    pub total_replacements: u64,
    /// Hits over all accesses, in `[0, 1]`.
    pub hit_ratio: f64,
    /// Page faults charged per pid.
    pub faults_per_process: BTreeMap<Pid, u64>,
}
