//! Process Control Block
//!
//! # Overview
//!
//! [`Process`] is the central entity of the simulation: descriptor data,
//! the burst queue, lifecycle state, statistics, and a dedicated worker
//! thread that performs the process's CPU work one tick at a time.
//!
//! # Rendezvous Contract
//!
//! The worker models user code running on the simulated CPU. It is driven
//! by a strict ping-pong barrier over one mutex and two condition
//! variables:
//!
//! ```text
//! kernel                         worker
//! ------                         ------
//! dispatched = true
//! tick_completed = false
//! notify(run)          ───────▶  wakes, consumes 1 tick of the head
//!                                burst, advances the instruction
//!                                pointer
//!                                dispatched = false
//! blocks on done       ◀───────  tick_completed = true, notify(done)
//! ```
//!
//! Exactly one unit of CPU work happens per rendezvous, and the kernel is
//! blocked until the worker reports completion, so progress stays
//! deterministic no matter how the OS schedules the threads. I/O bursts
//! are not the worker's job: while blocked the worker sleeps and the
//! kernel decrements the burst directly.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use super::reference;
use super::types::{
    Burst, BurstKind, PageNumber, Pid, ProcessDescriptor, ProcessError, ProcessSnapshot,
    ProcessState, ProcessStats,
};
use crate::domain::clock::Tick;

/// State shared between the kernel and the worker thread.
struct ProcessCore {
    state: ProcessState,
    bursts: VecDeque<Burst>,
    stats: ProcessStats,
    quantum_used: u32,
    instruction_pointer: usize,
    /// Rendezvous: the kernel has authorised one tick of work.
    dispatched: bool,
    /// Rendezvous: the worker has finished its tick.
    tick_completed: bool,
    /// Teardown flag; the worker exits at the next wakeup.
    stop: bool,
}

struct ProcessShared {
    core: Mutex<ProcessCore>,
    run: Condvar,
    done: Condvar,
}

/// A process and its Process Control Block.
///
/// The kernel exclusively owns every `Process`; schedulers and wait queues
/// hold [`Pid`] handles only. All mutation goes through the internal mutex,
/// so the kernel can drive a process through `&self` methods while the
/// worker thread holds its own reference.
pub struct Process {
    pid: Pid,
    arrival_time: Tick,
    priority: i32,
    required_pages: usize,
    reference_string: Arc<Vec<PageNumber>>,
    shared: Arc<ProcessShared>,
    worker: Option<JoinHandle<()>>,
}

impl Process {
    /// Construct a process from its descriptor.
    ///
    /// The page-reference string is generated here, seeded purely from the
    /// pid, with one entry per tick of CPU burst.
    ///
    /// # Errors
    ///
    /// Rejects pid 0, a process with no pages, or an empty burst list.
    pub fn new(descriptor: ProcessDescriptor) -> Result<Self, ProcessError> {
        if descriptor.pid.as_u32() == 0 {
            return Err(ProcessError::InvalidPid);
        }
        if descriptor.required_pages == 0 {
            return Err(ProcessError::NoPages {
                pid: descriptor.pid,
            });
        }
        if descriptor.bursts.is_empty() {
            return Err(ProcessError::NoBursts {
                pid: descriptor.pid,
            });
        }

        let total_cpu_ticks: usize = descriptor
            .bursts
            .iter()
            .filter(|b| b.kind == BurstKind::Cpu)
            .map(|b| b.remaining as usize)
            .sum();

        let reference_string = Arc::new(reference::generate(
            descriptor.pid,
            descriptor.required_pages,
            total_cpu_ticks,
        ));

        Ok(Self {
            pid: descriptor.pid,
            arrival_time: descriptor.arrival_time,
            priority: descriptor.priority,
            required_pages: descriptor.required_pages,
            reference_string,
            shared: Arc::new(ProcessShared {
                core: Mutex::new(ProcessCore {
                    state: ProcessState::New,
                    bursts: descriptor.bursts.into(),
                    stats: ProcessStats::default(),
                    quantum_used: 0,
                    instruction_pointer: 0,
                    dispatched: false,
                    tick_completed: false,
                    stop: false,
                }),
                run: Condvar::new(),
                done: Condvar::new(),
            }),
            worker: None,
        })
    }

    /// Process identifier.
    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Tick at which the process becomes eligible to run.
    #[inline]
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    /// Scheduling priority. Lower value means higher priority.
    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Number of distinct logical pages this process owns.
    #[inline]
    pub fn required_pages(&self) -> usize {
        self.required_pages
    }

    /// The precomputed page-reference string.
    #[inline]
    pub fn reference_string(&self) -> &[PageNumber] {
        &self.reference_string
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        self.shared.core.lock().state
    }

    /// Transition to `new_state` at time `now`, maintaining statistics.
    ///
    /// Entering `Ready` records the tick; leaving it accumulates the wait
    /// interval. The first entry into `Running` fixes `start_time`, and
    /// entry into `Terminated` fixes `finish_time`.
    ///
    /// # Panics
    ///
    /// Panics on any transition out of `Terminated`. That state is
    /// absorbing and an attempt to leave it is a kernel bug.
    pub fn set_state(&self, new_state: ProcessState, now: Tick) {
        let mut core = self.shared.core.lock();
        if core.state == new_state {
            return;
        }
        assert!(
            core.state != ProcessState::Terminated,
            "state violation: {} attempted {} -> {} after termination",
            self.pid,
            core.state,
            new_state,
        );

        if core.state == ProcessState::Ready {
            core.stats.total_wait_time += now - core.stats.last_ready_tick;
        }

        core.state = new_state;

        match new_state {
            ProcessState::Ready => core.stats.last_ready_tick = now,
            ProcessState::Running => {
                if core.stats.start_time.is_none() {
                    core.stats.start_time = Some(now);
                }
            }
            ProcessState::Terminated => core.stats.finish_time = Some(now),
            _ => {}
        }
    }

    /// Kind of the burst at the front of the queue, if any.
    pub fn current_burst_kind(&self) -> Option<BurstKind> {
        self.shared.core.lock().bursts.front().map(|b| b.kind)
    }

    /// Remaining duration of the current burst, or 0 when the queue is
    /// empty.
    pub fn current_burst_remaining(&self) -> u32 {
        self.shared
            .core
            .lock()
            .bursts
            .front()
            .map_or(0, |b| b.remaining)
    }

    /// Drop the (exhausted) front burst.
    pub fn advance_to_next_burst(&self) {
        self.shared.core.lock().bursts.pop_front();
    }

    /// Whether any bursts remain.
    pub fn has_more_bursts(&self) -> bool {
        !self.shared.core.lock().bursts.is_empty()
    }

    /// The logical page the next CPU tick will touch.
    pub fn current_page_requirement(&self) -> PageNumber {
        let ip = self.shared.core.lock().instruction_pointer;
        self.reference_string.get(ip).copied().unwrap_or(0)
    }

    /// Position in the reference string.
    pub fn instruction_pointer(&self) -> usize {
        self.shared.core.lock().instruction_pointer
    }

    /// Consume one tick of the current I/O burst. Returns `true` once the
    /// burst is exhausted.
    ///
    /// Called by the kernel while the worker sleeps; the worker only ever
    /// advances CPU bursts.
    pub fn consume_io_tick(&self) -> bool {
        let mut core = self.shared.core.lock();
        core.bursts.front_mut().map_or(true, Burst::consume_tick)
    }

    /// Ticks consumed under the current CPU tenure.
    pub fn quantum_used(&self) -> u32 {
        self.shared.core.lock().quantum_used
    }

    /// Reset the quantum counter. Done on every exit from `Running` and on
    /// I/O or fault resolution, so a fresh tenure starts with full credit.
    pub fn reset_quantum(&self) {
        self.shared.core.lock().quantum_used = 0;
    }

    /// Charge ticks against the current quantum.
    pub fn increment_quantum(&self, ticks: u32) {
        self.shared.core.lock().quantum_used += ticks;
    }

    /// Accumulate executed CPU time.
    pub fn add_cpu_time(&self, ticks: u64) {
        self.shared.core.lock().stats.total_cpu_time += ticks;
    }

    /// Accumulate I/O wait time (device bursts and disk penalties alike).
    pub fn add_io_time(&self, ticks: u64) {
        self.shared.core.lock().stats.total_io_time += ticks;
    }

    /// Record one page fault against this process.
    pub fn record_page_fault(&self) {
        self.shared.core.lock().stats.page_faults += 1;
    }

    /// Record one involuntary preemption.
    pub fn record_preemption(&self) {
        self.shared.core.lock().stats.preemptions += 1;
    }

    /// Copy of the accumulated statistics.
    pub fn stats(&self) -> ProcessStats {
        self.shared.core.lock().stats.clone()
    }

    /// Plain-data view of the whole PCB.
    pub fn snapshot(&self) -> ProcessSnapshot {
        let core = self.shared.core.lock();
        ProcessSnapshot {
            pid: self.pid,
            state: core.state,
            arrival_time: self.arrival_time,
            priority: self.priority,
            required_pages: self.required_pages,
            current_burst: core.bursts.front().copied(),
            bursts_remaining: core.bursts.len(),
            quantum_used: core.quantum_used,
            instruction_pointer: core.instruction_pointer,
            stats: core.stats.clone(),
        }
    }

    /// Spawn the worker thread. Idempotent.
    pub fn start_worker(&mut self) {
        if self.worker.is_some() {
            return;
        }

        {
            let mut core = self.shared.core.lock();
            core.stop = false;
            core.dispatched = false;
            core.tick_completed = false;
        }

        let shared = Arc::clone(&self.shared);
        let reference_len = self.reference_string.len();
        let handle = thread::Builder::new()
            .name(format!("pcb-{}", self.pid.as_u32()))
            .spawn(move || worker_loop(&shared, reference_len))
            .expect("worker thread spawn");
        self.worker = Some(handle);
    }

    /// Signal the worker to exit and join it. Idempotent.
    pub fn stop_worker(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        {
            let mut core = self.shared.core.lock();
            core.stop = true;
        }
        self.shared.run.notify_one();
        let _ = handle.join();
    }

    /// Authorise one tick of CPU work. The worker wakes and mutates its
    /// own burst cursor; pair with [`Process::wait_for_tick_completion`].
    pub fn signal_run(&self) {
        let mut core = self.shared.core.lock();
        core.dispatched = true;
        core.tick_completed = false;
        drop(core);
        self.shared.run.notify_one();
    }

    /// Block until the worker reports its tick done.
    pub fn wait_for_tick_completion(&self) {
        let mut core = self.shared.core.lock();
        while !core.tick_completed {
            self.shared.done.wait(&mut core);
        }
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        // The kernel joins workers on reset; this covers store clears that
        // bypass it.
        self.stop_worker();
    }
}

impl std::fmt::Debug for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("arrival_time", &self.arrival_time)
            .field("priority", &self.priority)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Body of the worker thread: wait to be dispatched, perform exactly one
/// tick of CPU work, report completion, repeat until stopped.
fn worker_loop(shared: &ProcessShared, reference_len: usize) {
    loop {
        let mut core = shared.core.lock();
        while !core.dispatched && !core.stop {
            shared.run.wait(&mut core);
        }
        if core.stop {
            return;
        }

        // One tick of user code: consume the head burst and touch the next
        // page in the reference string.
        if let Some(burst) = core.bursts.front_mut() {
            burst.consume_tick();
        }
        if core.instruction_pointer < reference_len {
            core.instruction_pointer += 1;
        }

        core.dispatched = false;
        core.tick_completed = true;
        drop(core);
        shared.done.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(pid: u32, bursts: Vec<Burst>) -> ProcessDescriptor {
        ProcessDescriptor {
            pid: Pid::new(pid),
            arrival_time: 0,
            priority: 1,
            required_pages: 4,
            bursts,
        }
    }

    fn cpu(duration: u32) -> Burst {
        Burst::new(BurstKind::Cpu, duration).unwrap()
    }

    fn io(duration: u32) -> Burst {
        Burst::new(BurstKind::Io, duration).unwrap()
    }

    #[test]
    fn test_construction_validates() {
        assert_eq!(
            Process::new(descriptor(0, vec![cpu(1)])).unwrap_err(),
            ProcessError::InvalidPid
        );

        let mut no_pages = descriptor(1, vec![cpu(1)]);
        no_pages.required_pages = 0;
        assert!(matches!(
            Process::new(no_pages).unwrap_err(),
            ProcessError::NoPages { .. }
        ));

        assert!(matches!(
            Process::new(descriptor(1, vec![])).unwrap_err(),
            ProcessError::NoBursts { .. }
        ));
    }

    #[test]
    fn test_reference_string_covers_cpu_ticks() {
        let p = Process::new(descriptor(1, vec![cpu(3), io(5), cpu(2)])).unwrap();
        assert_eq!(p.reference_string().len(), 5);
    }

    #[test]
    fn test_wait_time_accumulates_across_ready_intervals() {
        let p = Process::new(descriptor(1, vec![cpu(4)])).unwrap();

        p.set_state(ProcessState::Ready, 2);
        p.set_state(ProcessState::Running, 5);
        assert_eq!(p.stats().total_wait_time, 3);
        assert_eq!(p.stats().start_time, Some(5));

        p.set_state(ProcessState::Ready, 6);
        p.set_state(ProcessState::Running, 10);
        assert_eq!(p.stats().total_wait_time, 7);
        // First dispatch time is sticky.
        assert_eq!(p.stats().start_time, Some(5));
    }

    #[test]
    fn test_start_time_set_once_even_at_tick_zero() {
        let p = Process::new(descriptor(1, vec![cpu(4)])).unwrap();
        p.set_state(ProcessState::Ready, 0);
        p.set_state(ProcessState::Running, 0);
        p.set_state(ProcessState::Ready, 3);
        p.set_state(ProcessState::Running, 7);
        assert_eq!(p.stats().start_time, Some(0));
    }

    #[test]
    fn test_finish_time_recorded() {
        let p = Process::new(descriptor(1, vec![cpu(1)])).unwrap();
        p.set_state(ProcessState::Ready, 0);
        p.set_state(ProcessState::Running, 0);
        p.set_state(ProcessState::Terminated, 9);
        assert_eq!(p.stats().finish_time, Some(9));
    }

    #[test]
    #[should_panic(expected = "state violation")]
    fn test_terminated_is_absorbing() {
        let p = Process::new(descriptor(1, vec![cpu(1)])).unwrap();
        p.set_state(ProcessState::Terminated, 1);
        p.set_state(ProcessState::Ready, 2);
    }

    #[test]
    fn test_rendezvous_single_tick() {
        let mut p = Process::new(descriptor(1, vec![cpu(3)])).unwrap();
        p.start_worker();

        p.signal_run();
        p.wait_for_tick_completion();

        assert_eq!(p.current_burst_remaining(), 2);
        assert_eq!(p.instruction_pointer(), 1);

        p.stop_worker();
    }

    #[test]
    fn test_rendezvous_drains_burst() {
        let mut p = Process::new(descriptor(1, vec![cpu(2)])).unwrap();
        p.start_worker();

        for _ in 0..2 {
            p.signal_run();
            p.wait_for_tick_completion();
        }

        assert_eq!(p.current_burst_remaining(), 0);
        p.advance_to_next_burst();
        assert!(!p.has_more_bursts());

        p.stop_worker();
    }

    #[test]
    fn test_stop_worker_is_idempotent() {
        let mut p = Process::new(descriptor(1, vec![cpu(1)])).unwrap();
        p.start_worker();
        p.stop_worker();
        p.stop_worker();
    }

    #[test]
    fn test_kernel_advances_io_directly() {
        let p = Process::new(descriptor(1, vec![io(2)])).unwrap();
        assert!(!p.consume_io_tick());
        assert!(p.consume_io_tick());
    }

    #[test]
    fn test_quantum_bookkeeping() {
        let p = Process::new(descriptor(1, vec![cpu(5)])).unwrap();
        p.increment_quantum(1);
        p.increment_quantum(1);
        assert_eq!(p.quantum_used(), 2);
        p.reset_quantum();
        assert_eq!(p.quantum_used(), 0);
    }

    #[test]
    fn test_snapshot_reflects_core() {
        let p = Process::new(descriptor(4, vec![cpu(2), io(1)])).unwrap();
        p.set_state(ProcessState::Ready, 0);
        let snap = p.snapshot();
        assert_eq!(snap.pid, Pid::new(4));
        assert_eq!(snap.state, ProcessState::Ready);
        assert_eq!(snap.bursts_remaining, 2);
        assert_eq!(snap.current_burst.unwrap().kind, BurstKind::Cpu);
    }
}
