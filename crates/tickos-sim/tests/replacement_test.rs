//! Replacement-Policy Tests
//!
//! The three paging policies driven directly through the capability
//! interface, plus a full-kernel thrashing run that cross-checks the
//! fault accounting between the kernel and the manager.

use tickos_sim::domain::clock::SimClock;
use tickos_sim::domain::memory::{
    FifoMemoryManager, LruMemoryManager, MemoryManager, OptimalMemoryManager, PageRequest,
};
use tickos_sim::domain::process::{Burst, BurstKind, Pid, ProcessDescriptor, ProcessState};
use tickos_sim::domain::scheduler::FcfsScheduler;
use tickos_sim::domain::simulator::Simulator;

fn loaded_pages(mgr: &dyn MemoryManager, pid: Pid) -> Vec<usize> {
    mgr.page_table_for_process(pid)
        .into_iter()
        .filter(|e| e.present)
        .map(|e| e.page_number)
        .collect()
}

#[test]
fn test_fifo_evicts_first_loaded() {
    // Three frames, reference string 0,1,2,3.
    let clock = SimClock::new();
    let mgr = FifoMemoryManager::new(3, clock.handle());
    let pid = Pid::new(1);
    mgr.allocate_for_process(pid, 4);

    for page in [0, 1, 2] {
        assert_eq!(mgr.request_page(pid, page), PageRequest::Fault);
        clock.tick();
    }
    assert_eq!(mgr.request_page(pid, 3), PageRequest::Replacement);

    assert_eq!(loaded_pages(&mgr, pid), vec![1, 2, 3]);
}

#[test]
fn test_lru_and_fifo_diverge_on_reuse() {
    // Reference 0,1,2,1,0,3 over three frames. LRU keeps the re-used
    // pages and evicts 2; FIFO ignores recency and evicts 0.
    let reference = [0usize, 1, 2, 1, 0];
    let pid = Pid::new(1);

    let clock = SimClock::new();
    let lru = LruMemoryManager::new(3, clock.handle());
    let fifo = FifoMemoryManager::new(3, clock.handle());
    lru.allocate_for_process(pid, 4);
    fifo.allocate_for_process(pid, 4);

    for &page in &reference {
        lru.request_page(pid, page);
        fifo.request_page(pid, page);
        clock.tick();
    }
    assert_eq!(lru.request_page(pid, 3), PageRequest::Replacement);
    assert_eq!(fifo.request_page(pid, 3), PageRequest::Replacement);

    assert_eq!(loaded_pages(&lru, pid), vec![0, 1, 3]);
    assert_eq!(loaded_pages(&fifo, pid), vec![1, 2, 3]);
}

#[test]
fn test_fifo_cyclic_walk_thrashes() {
    // A cyclic walk over F+1 pages with F frames replaces on every access
    // after the first lap, always evicting the page loaded longest ago.
    let clock = SimClock::new();
    let mgr = FifoMemoryManager::new(3, clock.handle());
    let pid = Pid::new(1);
    mgr.allocate_for_process(pid, 4);

    for page in [0, 1, 2] {
        assert_eq!(mgr.request_page(pid, page), PageRequest::Fault);
        clock.tick();
    }
    for lap in 0..2 {
        for page in [3, 0, 1, 2] {
            assert_eq!(
                mgr.request_page(pid, page),
                PageRequest::Replacement,
                "lap {lap} page {page}",
            );
            clock.tick();
        }
    }

    let stats = mgr.stats();
    assert_eq!(stats.total_replacements, 8);
    assert_eq!(stats.total_page_faults, 11);
}

#[test]
fn test_optimal_beats_lru_on_known_future() {
    // Reference 0,1,2,0,1,3,0,1 over three frames. At the arrival of 3,
    // LRU evicts 2's neighbour by recency while Optimal evicts 2, which
    // never recurs, and so never faults again.
    let reference = [0usize, 1, 2, 0, 1, 3, 0, 1];
    let pid = Pid::new(1);

    let clock = SimClock::new();
    let optimal = OptimalMemoryManager::new(3, clock.handle());
    optimal.allocate_for_process(pid, 4);
    optimal.register_future_references(pid, &reference);

    let mut faults = 0;
    for &page in &reference {
        if optimal.request_page(pid, page) != PageRequest::Hit {
            faults += 1;
        }
        optimal.advance_instruction_pointer(pid);
        clock.tick();
    }

    // Four distinct pages, one replacement, no avoidable faults.
    assert_eq!(faults, 4);
    assert_eq!(optimal.stats().total_replacements, 1);
    assert!(optimal.is_page_loaded(pid, 0));
    assert!(optimal.is_page_loaded(pid, 1));
    assert!(optimal.is_page_loaded(pid, 3));
}

#[test]
fn test_allocate_free_restores_snapshot() {
    let clock = SimClock::new();
    let mgr = LruMemoryManager::new(4, clock.handle());
    let pid = Pid::new(7);

    let frames_before = mgr.frame_status();

    mgr.allocate_for_process(pid, 3);
    mgr.request_page(pid, 0);
    mgr.request_page(pid, 2);
    mgr.free_for_process(pid);

    let frames_after = mgr.frame_status();
    assert_eq!(frames_before, frames_after);
    assert!(mgr.page_table_for_process(pid).is_empty());

    // Monotonic counters survive the round trip.
    assert_eq!(mgr.stats().total_page_faults, 2);
    assert_eq!(mgr.stats().used_frames, 0);
}

#[test]
fn test_kernel_and_manager_fault_accounting_agree() {
    // A single process whose working set exceeds physical memory. Every
    // fault the kernel counts must also be counted by the manager and by
    // the process itself.
    let mut sim = Simulator::default();
    sim.load_processes(vec![ProcessDescriptor {
        pid: Pid::new(1),
        arrival_time: 0,
        priority: 1,
        required_pages: 5,
        bursts: vec![Burst::new(BurstKind::Cpu, 30).unwrap()],
    }]);
    sim.set_scheduler(Box::new(FcfsScheduler::new()));
    let handle = sim.clock_handle();
    sim.set_memory_manager(Box::new(FifoMemoryManager::new(2, handle)));
    sim.start().unwrap();

    for _ in 0..600 {
        sim.tick(false);
        if sim.metrics().completed_processes == 1 {
            break;
        }
    }

    let snap = &sim.all_processes()[0];
    assert_eq!(snap.state, ProcessState::Terminated);
    assert!(snap.stats.page_faults > 0);
    assert_eq!(sim.metrics().total_page_faults, snap.stats.page_faults);
    assert_eq!(sim.memory_stats().total_page_faults, snap.stats.page_faults);
    // Disk penalties were charged for every fault.
    assert_eq!(snap.stats.total_io_time, 5 * snap.stats.page_faults);
    assert_eq!(snap.stats.total_cpu_time, 30);
}
