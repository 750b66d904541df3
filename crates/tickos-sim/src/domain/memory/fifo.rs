//! FIFO Replacement
//!
//! Victim selection by load order: a queue of `(pid, page)` pairs records
//! the order pages entered memory, and the front of the queue is evicted
//! when no frame is free. Hits do not reorder anything.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

use super::pool::FramePool;
use super::types::{FrameSnapshot, MemoryStats, PageRequest, PageTableEntrySnapshot};
use super::MemoryManager;
use crate::domain::clock::ClockHandle;
use crate::domain::process::{PageNumber, Pid};

struct FifoState {
    pool: FramePool,
    /// `(pid, page)` pairs in load order; front is the eviction candidate.
    load_order: VecDeque<(Pid, PageNumber)>,
}

/// First-in, first-out page replacement.
pub struct FifoMemoryManager {
    state: Mutex<FifoState>,
    clock: ClockHandle,
}

impl FifoMemoryManager {
    /// Create a manager over `total_frames` frames, timestamping with
    /// `clock`.
    ///
    /// # Panics
    ///
    /// Panics if `total_frames` is zero.
    pub fn new(total_frames: usize, clock: ClockHandle) -> Self {
        Self {
            state: Mutex::new(FifoState {
                pool: FramePool::new(total_frames),
                load_order: VecDeque::new(),
            }),
            clock,
        }
    }
}

impl MemoryManager for FifoMemoryManager {
    fn is_page_loaded(&self, pid: Pid, page: PageNumber) -> bool {
        self.state.lock().pool.is_loaded(pid, page)
    }

    fn request_page(&self, pid: Pid, page: PageNumber) -> PageRequest {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.pool.is_loaded(pid, page) {
            state.pool.record_hit();
            return PageRequest::Hit;
        }

        state.pool.record_fault(pid);

        if let Some(frame) = state.pool.find_free_frame() {
            state.pool.load_page(pid, page, frame, now);
            state.load_order.push_back((pid, page));
            debug!(target: "mem", %pid, page, frame, "fifo: fault into free frame");
            return PageRequest::Fault;
        }

        // All frames occupied: evict the oldest load.
        let victim_frame = state
            .load_order
            .pop_front()
            .and_then(|(vp, vpage)| state.pool.frame_of(vp, vpage))
            .or_else(|| state.pool.frames().iter().position(|f| !f.is_free()))
            .unwrap_or(0);

        state.pool.evict_frame(victim_frame);
        state.pool.load_page(pid, page, victim_frame, now);
        state.load_order.push_back((pid, page));
        state.pool.record_replacement();
        debug!(target: "mem", %pid, page, frame = victim_frame, "fifo: replacement");

        PageRequest::Replacement
    }

    fn complete_page_load(&self, pid: Pid, page: PageNumber) {
        let now = self.clock.now();
        self.state.lock().pool.touch(pid, page, now);
    }

    fn allocate_for_process(&self, pid: Pid, required_pages: usize) {
        self.state.lock().pool.allocate(pid, required_pages);
    }

    fn free_for_process(&self, pid: Pid) {
        let mut state = self.state.lock();
        state.pool.release_process(pid);
        state.load_order.retain(|&(owner, _)| owner != pid);
    }

    fn frame_status(&self) -> Vec<FrameSnapshot> {
        self.state.lock().pool.frame_status()
    }

    fn page_table_for_process(&self, pid: Pid) -> Vec<PageTableEntrySnapshot> {
        self.state.lock().pool.page_table_for(pid)
    }

    fn stats(&self) -> MemoryStats {
        self.state.lock().pool.stats()
    }

    fn name(&self) -> String {
        "FIFO (First-In, First-Out)".to_owned()
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.pool.reset();
        state.load_order.clear();
    }
}
