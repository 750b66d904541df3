//! Optimal Replacement
//!
//! Belady's algorithm: evict the page whose next use lies farthest in the
//! future, infinitely far if it is never used again. The policy can only
//! do this because the simulator knows each process's full reference
//! string up front; the kernel registers it on arrival and advances a
//! per-process cursor after every executed CPU tick so distances are
//! measured from the process's actual position.
//!
//! The future-reference registry lives in a `DashMap` beside the frame
//! pool: cursor advances happen every tick and need no coordination with
//! frame state, only victim selection reads both.

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::pool::FramePool;
use super::types::{FrameId, FrameSnapshot, MemoryStats, PageRequest, PageTableEntrySnapshot};
use super::MemoryManager;
use crate::domain::clock::ClockHandle;
use crate::domain::process::{PageNumber, Pid};

/// A process's future accesses and its current position in them.
struct FutureReferences {
    pages: Vec<PageNumber>,
    cursor: usize,
}

/// Belady's optimal page replacement.
pub struct OptimalMemoryManager {
    pool: Mutex<FramePool>,
    future: DashMap<Pid, FutureReferences>,
    clock: ClockHandle,
}

impl OptimalMemoryManager {
    /// Create a manager over `total_frames` frames, timestamping with
    /// `clock`.
    ///
    /// # Panics
    ///
    /// Panics if `total_frames` is zero.
    pub fn new(total_frames: usize, clock: ClockHandle) -> Self {
        Self {
            pool: Mutex::new(FramePool::new(total_frames)),
            future: DashMap::new(),
            clock,
        }
    }

    /// Ticks until `(pid, page)` is used again, measured from the
    /// process's cursor. `usize::MAX` when the page never recurs, which
    /// makes it the ideal victim.
    fn next_use_distance(&self, pid: Pid, page: PageNumber) -> usize {
        let Some(refs) = self.future.get(&pid) else {
            return usize::MAX;
        };
        refs.pages[refs.cursor.min(refs.pages.len())..]
            .iter()
            .position(|&future_page| future_page == page)
            .unwrap_or(usize::MAX)
    }

    /// Occupied frame owning the page with the farthest next use.
    fn select_victim(&self, pool: &FramePool) -> Option<FrameId> {
        let mut victim: Option<(FrameId, usize)> = None;
        for (frame_id, frame) in pool.frames().iter().enumerate() {
            let Some((pid, page)) = frame.owner else {
                continue;
            };
            let distance = self.next_use_distance(pid, page);
            if victim.map_or(true, |(_, best)| distance > best) {
                victim = Some((frame_id, distance));
            }
        }
        victim.map(|(frame_id, _)| frame_id)
    }
}

impl MemoryManager for OptimalMemoryManager {
    fn is_page_loaded(&self, pid: Pid, page: PageNumber) -> bool {
        self.pool.lock().is_loaded(pid, page)
    }

    fn request_page(&self, pid: Pid, page: PageNumber) -> PageRequest {
        let now = self.clock.now();
        let mut pool = self.pool.lock();

        if pool.is_loaded(pid, page) {
            pool.record_hit();
            return PageRequest::Hit;
        }

        pool.record_fault(pid);

        if let Some(frame) = pool.find_free_frame() {
            pool.load_page(pid, page, frame, now);
            debug!(target: "mem", %pid, page, frame, "optimal: fault into free frame");
            return PageRequest::Fault;
        }

        let victim = self.select_victim(&pool).unwrap_or(0);
        pool.evict_frame(victim);
        pool.load_page(pid, page, victim, now);
        pool.record_replacement();
        debug!(target: "mem", %pid, page, frame = victim, "optimal: replacement");

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
        self.future.remove(&pid);
    }

    fn register_future_references(&self, pid: Pid, reference_string: &[PageNumber]) {
        self.future.insert(
            pid,
            FutureReferences {
                pages: reference_string.to_vec(),
                cursor: 0,
            },
        );
    }

    fn advance_instruction_pointer(&self, pid: Pid) {
        if let Some(mut refs) = self.future.get_mut(&pid) {
            if refs.cursor < refs.pages.len() {
                refs.cursor += 1;
            }
        }
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
        "Optimal (Theoretical)".to_owned()
    }

    fn reset(&self) {
        self.pool.lock().reset();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::SimClock;

    fn manager(frames: usize) -> OptimalMemoryManager {
        let clock = SimClock::new();
        OptimalMemoryManager::new(frames, clock.handle())
    }

    #[test]
    fn test_farthest_next_use_is_victim() {
        let mgr = manager(3);
        let pid = Pid::new(1);
        mgr.allocate_for_process(pid, 4);
        // Future: 0 1 2 3 0 1. When 3 arrives (cursor at index 3), next
        // uses are 0 -> 1 away, 1 -> 2 away, 2 -> never. Evict 2.
        mgr.register_future_references(pid, &[0, 1, 2, 3, 0, 1]);

        for page in [0, 1, 2] {
            assert_eq!(mgr.request_page(pid, page), PageRequest::Fault);
            mgr.advance_instruction_pointer(pid);
        }
        assert_eq!(mgr.request_page(pid, 3), PageRequest::Replacement);

        assert!(mgr.is_page_loaded(pid, 0));
        assert!(mgr.is_page_loaded(pid, 1));
        assert!(!mgr.is_page_loaded(pid, 2));
        assert!(mgr.is_page_loaded(pid, 3));
    }

    #[test]
    fn test_cursor_changes_the_verdict() {
        let mgr = manager(2);
        let pid = Pid::new(1);
        mgr.allocate_for_process(pid, 3);
        // Future: 0 1 2 0 1. When 2 arrives (cursor at index 2) page 0
        // recurs sooner than page 1, so page 1 is the victim.
        mgr.register_future_references(pid, &[0, 1, 2, 0, 1]);

        mgr.request_page(pid, 0);
        mgr.advance_instruction_pointer(pid);
        mgr.request_page(pid, 1);
        mgr.advance_instruction_pointer(pid);

        assert_eq!(mgr.request_page(pid, 2), PageRequest::Replacement);

        assert!(mgr.is_page_loaded(pid, 0));
        assert!(!mgr.is_page_loaded(pid, 1));
        assert!(mgr.is_page_loaded(pid, 2));
    }

    #[test]
    fn test_unregistered_process_pages_go_first() {
        let mgr = manager(2);
        let registered = Pid::new(1);
        let stranger = Pid::new(2);
        mgr.allocate_for_process(registered, 2);
        mgr.allocate_for_process(stranger, 2);
        mgr.register_future_references(registered, &[0, 0, 0, 0]);

        mgr.request_page(registered, 0);
        mgr.request_page(stranger, 0);

        // The stranger has no future knowledge, so its page looks never
        // used again and is the victim.
        assert_eq!(mgr.request_page(registered, 1), PageRequest::Replacement);
        assert!(!mgr.is_page_loaded(stranger, 0));
        assert!(mgr.is_page_loaded(registered, 0));
    }

    #[test]
    fn test_free_drops_future_bookkeeping() {
        let mgr = manager(2);
        let pid = Pid::new(1);
        mgr.allocate_for_process(pid, 2);
        mgr.register_future_references(pid, &[0, 1]);

        mgr.request_page(pid, 0);
        mgr.free_for_process(pid);

        assert!(mgr.page_table_for_process(pid).is_empty());
        assert_eq!(mgr.stats().used_frames, 0);
        // A fresh allocation starts from a clean registry.
        assert_eq!(mgr.next_use_distance(pid, 0), usize::MAX);
    }
}
