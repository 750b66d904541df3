//! Frame Pool
//!
//! State shared by every replacement policy: the physical frames, the
//! per-process page tables, and the hit/fault accounting. Policies wrap a
//! pool in their own lock and contribute only victim selection and any
//! bookkeeping that selection needs.

use std::collections::BTreeMap;

use super::types::{
    Frame, FrameId, FrameSnapshot, MemoryStats, PageTable, PageTableEntry,
    PageTableEntrySnapshot,
};
use crate::domain::clock::Tick;
use crate::domain::process::{PageNumber, Pid};

pub(crate) struct FramePool {
    frames: Vec<Frame>,
    tables: BTreeMap<Pid, PageTable>,
    hits: u64,
    page_faults: u64,
    replacements: u64,
    faults_per_process: BTreeMap<Pid, u64>,
}

impl FramePool {
    pub(crate) fn new(total_frames: usize) -> Self {
        assert!(total_frames > 0, "total frames must be positive");
        Self {
            frames: vec![Frame::default(); total_frames],
            tables: BTreeMap::new(),
            hits: 0,
            page_faults: 0,
            replacements: 0,
            faults_per_process: BTreeMap::new(),
        }
    }

    pub(crate) fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn is_loaded(&self, pid: Pid, page: PageNumber) -> bool {
        self.tables
            .get(&pid)
            .and_then(|table| table.get(&page))
            .is_some_and(|entry| entry.present())
    }

    /// Frame currently holding `(pid, page)`, if present.
    pub(crate) fn frame_of(&self, pid: Pid, page: PageNumber) -> Option<FrameId> {
        self.tables
            .get(&pid)
            .and_then(|table| table.get(&page))
            .and_then(|entry| entry.frame)
    }

    /// Create an empty page table for `pid`. A second allocation for the
    /// same pid is a no-op.
    pub(crate) fn allocate(&mut self, pid: Pid, required_pages: usize) {
        self.tables.entry(pid).or_insert_with(|| {
            (0..required_pages)
                .map(|page| (page, PageTableEntry::default()))
                .collect()
        });
    }

    /// Release every frame owned by `pid` and drop its page table. Fault
    /// counters are monotonic and survive.
    pub(crate) fn release_process(&mut self, pid: Pid) {
        for frame in &mut self.frames {
            if frame.owner.is_some_and(|(owner, _)| owner == pid) {
                frame.release();
            }
        }
        self.tables.remove(&pid);
    }

    pub(crate) fn find_free_frame(&self) -> Option<FrameId> {
        self.frames.iter().position(Frame::is_free)
    }

    /// Install `(pid, page)` into `frame`, updating frame and page table
    /// together so the two views cannot drift.
    pub(crate) fn load_page(&mut self, pid: Pid, page: PageNumber, frame: FrameId, now: Tick) {
        debug_assert!(
            self.tables.contains_key(&pid),
            "page request before allocation for {pid}",
        );
        self.frames[frame].occupy(pid, page, now);
        self.tables
            .entry(pid)
            .or_default()
            .entry(page)
            .or_default()
            .load(frame, now);
    }

    /// Evict whatever `frame` holds, clearing the owner's page-table entry
    /// and freeing the frame.
    pub(crate) fn evict_frame(&mut self, frame: FrameId) {
        let Some((pid, page)) = self.frames[frame].owner else {
            return;
        };
        if let Some(entry) = self.tables.get_mut(&pid).and_then(|t| t.get_mut(&page)) {
            entry.evict();
        }
        self.frames[frame].release();
    }

    /// Refresh access timestamps of a resident page.
    pub(crate) fn touch(&mut self, pid: Pid, page: PageNumber, now: Tick) {
        let Some(entry) = self.tables.get_mut(&pid).and_then(|t| t.get_mut(&page)) else {
            return;
        };
        if let Some(frame) = entry.frame {
            entry.last_access = now;
            entry.referenced = true;
            self.frames[frame].last_access_tick = now;
        }
    }

    /// Occupied frame with the smallest last-access tick.
    pub(crate) fn least_recently_used(&self) -> Option<FrameId> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_free())
            .min_by_key(|(_, f)| f.last_access_tick)
            .map(|(id, _)| id)
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_fault(&mut self, pid: Pid) {
        self.page_faults += 1;
        *self.faults_per_process.entry(pid).or_insert(0) += 1;
    }

    pub(crate) fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    pub(crate) fn frame_status(&self) -> Vec<FrameSnapshot> {
        self.frames
            .iter()
            .enumerate()
            .map(|(frame_id, frame)| FrameSnapshot {
                frame_id,
                occupied: !frame.is_free(),
                owner_pid: frame.owner.map(|(pid, _)| pid),
                page_number: frame.owner.map(|(_, page)| page),
                loaded_at_tick: frame.load_tick,
                last_access_tick: frame.last_access_tick,
            })
            .collect()
    }

    pub(crate) fn page_table_for(&self, pid: Pid) -> Vec<PageTableEntrySnapshot> {
        self.tables.get(&pid).map_or_else(Vec::new, |table| {
            table
                .iter()
                .map(|(&page_number, entry)| PageTableEntrySnapshot {
                    page_number,
                    frame_number: entry.frame,
                    present: entry.present(),
                    referenced: entry.referenced,
                    modified: entry.modified,
                })
                .collect()
        })
    }

    pub(crate) fn stats(&self) -> MemoryStats {
        let accesses = self.hits + self.page_faults;
        MemoryStats {
            total_frames: self.frames.len(),
            used_frames: self.frames.iter().filter(|f| !f.is_free()).count(),
            total_page_faults: self.page_faults,
            total_replacements: self.replacements,
            hit_ratio: if accesses > 0 {
                self.hits as f64 / accesses as f64
            } else {
                0.0
            },
            faults_per_process: self.faults_per_process.clone(),
        }
    }

    pub(crate) fn reset(&mut self) {
        let total = self.frames.len();
        *self = Self::new(total);
    }
}
