//! LRU Replacement
//!
//! Victim selection by recency: every hit refreshes the frame's and page
//! entry's access timestamp to the current tick, and the occupied frame
//! with the oldest timestamp is evicted when no frame is free.

use parking_lot::Mutex;
use tracing::debug;

use super::pool::FramePool;
use super::types::{FrameSnapshot, MemoryStats, PageRequest, PageTableEntrySnapshot};
use super::MemoryManager;
use crate::domain::clock::ClockHandle;
use crate::domain::process::{PageNumber, Pid};

/// Least-recently-used page replacement.
pub struct LruMemoryManager {
    pool: Mutex<FramePool>,
    clock: ClockHandle,
}

impl LruMemoryManager {
    /// Create a manager over `total_frames` frames, timestamping with
    /// `clock`.
    ///
    /// # Panics
    ///
    /// Panics if `total_frames` is zero.
    pub fn new(total_frames: usize, clock: ClockHandle) -> Self {
        Self {
            pool: Mutex::new(FramePool::new(total_frames)),
            clock,
        }
    }
}

impl MemoryManager for LruMemoryManager {
    fn is_page_loaded(&self, pid: Pid, page: PageNumber) -> bool {
        self.pool.lock().is_loaded(pid, page)
    }

    fn request_page(&self, pid: Pid, page: PageNumber) -> PageRequest {
        let now = self.clock.now();
        let mut pool = self.pool.lock();

        if pool.is_loaded(pid, page) {
            pool.touch(pid, page, now);
            pool.record_hit();
            return PageRequest::Hit;
        }

        pool.record_fault(pid);

        if let Some(frame) = pool.find_free_frame() {
            pool.load_page(pid, page, frame, now);
            debug!(target: "mem", %pid, page, frame, "lru: fault into free frame");
            return PageRequest::Fault;
        }

        let victim = pool.least_recently_used().unwrap_or(0);
        pool.evict_frame(victim);
        pool.load_page(pid, page, victim, now);
        pool.record_replacement();
        debug!(target: "mem", %pid, page, frame = victim, "lru: replacement");

        PageRequest::Replacement
    }

    fn complete_page_load(&self, pid: Pid, page: PageNumber) {
        let now = self.clock.now();
        self.pool.lock().touch(pid, page, now);
    }

    fn allocate_for_process(&self, pid: Pid, required_pages: usize) {
        self.pool.lock().allocate(pid, required_pages);
    }

    fn free_for_process(&self, pid: Pid) {
        self.pool.lock().release_process(pid);
    }

    fn frame_status(&self) -> Vec<FrameSnapshot> {
        self.pool.lock().frame_status()
    }

    fn page_table_for_process(&self, pid: Pid) -> Vec<PageTableEntrySnapshot> {
        self.pool.lock().page_table_for(pid)
    }

    fn stats(&self) -> MemoryStats {
        self.pool.lock().stats()
    }

    fn name(&self) -> String {
        "LRU (Least Recently Used)".to_owned()
    }

    fn reset(&self) {
        self.pool.lock().reset();
    }
}
