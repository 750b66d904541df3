//! Simulation Kernel
//!
//! # Overview
//!
//! [`Simulator`] owns every process and drives the central tick loop. Each
//! tick advances, in this order:
//!
//! 1. I/O progress for the head of the blocked queue.
//! 2. Disk-load countdown for the head of the memory-wait queue.
//! 3. The CPU slot: either one tick of context-switch overhead, or one
//!    tick of the running process (page check, worker rendezvous, burst
//!    accounting, termination or yield).
//! 4. Arrivals, which may preempt the CPU holder on strict priority.
//! 5. A scheduling decision if the CPU is idle and no switch is in
//!    flight.
//! 6. Metrics recomputation.
//! 7. Clock advance.
//!
//! # Ownership
//!
//! The kernel is the single owner of every [`Process`]. Schedulers and
//! wait queues carry [`Pid`] handles that resolve against the process
//! store until the process terminates and its memory is freed. Snapshot
//! accessors copy plain data out; observers never see live kernel state.
//!
//! # Context-Switch Accounting
//!
//! Overhead is charged only when a live process is preempted or yields.
//! Dispatching onto an idle CPU, or right after a termination, is a free
//! scheduler decision rather than a register save, which keeps the CPU
//! utilization figure honest.

mod config;
mod metrics;

pub use config::SimulatorConfig;
pub use metrics::SimulatorMetrics;

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::clock::{ClockHandle, SimClock, Tick};
use crate::domain::memory::{
    FrameSnapshot, MemoryManager, MemoryStats, PageTableEntrySnapshot,
};
use crate::domain::monitor::CpuMonitor;
use crate::domain::process::{
    BurstKind, PageNumber, Pid, Process, ProcessDescriptor, ProcessSnapshot, ProcessState,
};
use crate::domain::scheduler::{ReadyEntry, Scheduler, SchedulerMetrics};

/// A process stalled on page-fault disk latency.
#[derive(Debug, Clone, Copy)]
struct MemoryWait {
    pid: Pid,
    page: PageNumber,
    ticks_remaining: u32,
}

/// Observer view of one memory-wait entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryWaitSnapshot {
    /// The stalled process.
    pub pid: Pid,
    /// The page being loaded.
    pub page_number: PageNumber,
    /// Penalty ticks left.
    pub ticks_remaining: u32,
}

/// Reasons `start` can refuse to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No scheduler was injected.
    SchedulerMissing,
    /// No memory manager was injected.
    MemoryManagerMissing,
    /// No processes are loaded.
    NoProcesses,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::SchedulerMissing => write!(f, "no scheduler configured"),
            ConfigurationError::MemoryManagerMissing => {
                write!(f, "no memory manager configured")
            }
            ConfigurationError::NoProcesses => write!(f, "no processes loaded"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// The central engine of the simulation.
pub struct Simulator {
    config: SimulatorConfig,
    clock: SimClock,
    monitor: CpuMonitor,
    scheduler: Option<Box<dyn Scheduler>>,
    memory: Option<Box<dyn MemoryManager>>,

    /// Owner of every PCB.
    processes: Vec<Process>,
    index: HashMap<Pid, usize>,

    /// Not yet arrived, sorted by `(arrival_time, pid)`.
    incoming: VecDeque<Pid>,
    /// Consuming an I/O burst; the head advances one tick per tick.
    blocked: VecDeque<Pid>,
    /// Stalled on disk latency; the head counts down one tick per tick.
    memory_wait: VecDeque<MemoryWait>,

    running: Option<Pid>,
    /// Process to install when the switch counter reaches zero.
    pending_next: Option<Pid>,
    switch_ticks_remaining: u32,

    cpu_active_ticks: u64,
    total_page_faults: u64,
    total_context_switches: u64,
    metrics: SimulatorMetrics,

    active: bool,
}

impl Simulator {
    /// Create a kernel with the given constants and no policies.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            clock: SimClock::new(),
            monitor: CpuMonitor::new(),
            scheduler: None,
            memory: None,
            processes: Vec::new(),
            index: HashMap::new(),
            incoming: VecDeque::new(),
            blocked: VecDeque::new(),
            memory_wait: VecDeque::new(),
            running: None,
            pending_next: None,
            switch_ticks_remaining: 0,
            cpu_active_ticks: 0,
            total_page_faults: 0,
            total_context_switches: 0,
            metrics: SimulatorMetrics::default(),
            active: false,
        }
    }

    /// Consume process descriptors into the process store.
    ///
    /// Clears every internal queue, rewinds the clock, resets metric
    /// accumulators and any injected policies, and sorts the incoming set
    /// by `(arrival_time, pid)`. Invalid descriptors (and duplicate pids)
    /// are rejected with a logged diagnostic; the rest proceed.
    ///
    /// Returns the number of processes actually loaded.
    pub fn load_processes(&mut self, descriptors: Vec<ProcessDescriptor>) -> usize {
        self.clear_run_state();

        for descriptor in descriptors {
            let pid = descriptor.pid;
            if self.index.contains_key(&pid) {
                warn!(target: "sys", %pid, "duplicate pid rejected");
                continue;
            }
            match Process::new(descriptor) {
                Ok(process) => {
                    self.index.insert(pid, self.processes.len());
                    self.processes.push(process);
                }
                Err(e) => warn!(target: "sys", %pid, error = %e, "process definition rejected"),
            }
        }

        let mut order: Vec<Pid> = self.processes.iter().map(Process::pid).collect();
        order.sort_by_key(|&pid| {
            let p = &self.processes[self.index[&pid]];
            (p.arrival_time(), pid)
        });
        self.incoming = order.into();

        self.metrics.total_processes = self.processes.len();
        info!(target: "sys", count = self.processes.len(), "processes loaded");
        self.processes.len()
    }

    /// Inject the scheduling policy. Replaces any prior instance.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        info!(target: "sys", name = %scheduler.name(), "scheduler configured");
        self.scheduler = Some(scheduler);
    }

    /// Inject the paging policy. Replaces any prior instance.
    pub fn set_memory_manager(&mut self, memory: Box<dyn MemoryManager>) {
        info!(target: "sys", name = %memory.name(), "memory manager configured");
        self.memory = Some(memory);
    }

    /// Allow externally driven ticks to advance the simulation.
    ///
    /// # Errors
    ///
    /// Refuses, with a logged diagnostic and no state change, when no
    /// scheduler, no memory manager, or no processes are configured.
    pub fn start(&mut self) -> Result<(), ConfigurationError> {
        let err = if self.scheduler.is_none() {
            Some(ConfigurationError::SchedulerMissing)
        } else if self.memory.is_none() {
            Some(ConfigurationError::MemoryManagerMissing)
        } else if self.processes.is_empty() {
            Some(ConfigurationError::NoProcesses)
        } else {
            None
        };
        if let Some(e) = err {
            error!(target: "sys", error = %e, "cannot start simulation");
            return Err(e);
        }

        self.active = true;
        info!(target: "sys", "simulation started");
        Ok(())
    }

    /// Stop honouring externally driven ticks. Cooperative; no in-flight
    /// tick is aborted.
    pub fn stop(&mut self) {
        self.active = false;
        info!(target: "sys", "simulation stopped");
    }

    /// Stop, join every worker thread, and clear all state. Idempotent.
    pub fn reset(&mut self) {
        self.stop();
        self.clear_run_state();
        info!(target: "sys", "simulation reset");
    }

    /// Advance one tick. Without `force`, the tick is ignored unless the
    /// simulation has been started.
    pub fn tick(&mut self, force: bool) {
        if !self.active && !force {
            return;
        }
        self.step();
    }

    // ------------------------------------------------------------------
    // The tick loop
    // ------------------------------------------------------------------

    fn step(&mut self) {
        let now = self.clock.now();

        self.handle_io(now);
        self.handle_memory_wait(now);

        if self.switch_ticks_remaining > 0 {
            // Overhead tick: the CPU is busy doing kernel work.
            self.switch_ticks_remaining -= 1;
            if self.switch_ticks_remaining == 0 {
                if let Some(next) = self.pending_next.take() {
                    self.install_running(next, now);
                    info!(target: "sched", tick = now, pid = %next, "context switch complete");
                }
            }
        } else {
            self.handle_cpu_execution(now);
        }

        self.handle_arrivals(now);

        if self.running.is_none() && self.switch_ticks_remaining == 0 {
            self.handle_scheduling(now);
        }

        self.update_metrics(now);
        self.clock.tick();
    }

    /// Service the head of the blocked queue: one tick of I/O per tick.
    fn handle_io(&mut self, now: Tick) {
        let Some(&pid) = self.blocked.front() else {
            return;
        };

        let finished = match self.process(pid) {
            Some(p) => {
                let finished = p.consume_io_tick();
                p.add_io_time(1);
                if finished {
                    p.advance_to_next_burst();
                    p.reset_quantum();
                    p.set_state(ProcessState::Ready, now);
                }
                finished
            }
            None => true,
        };

        if finished {
            self.blocked.pop_front();
            self.enqueue_ready(pid);
            info!(target: "notify", tick = now, %pid, "io burst complete");
        }
    }

    /// Count down the head of the memory-wait queue; on zero, finish the
    /// page load and release the process back to ready.
    fn handle_memory_wait(&mut self, now: Tick) {
        let (pid, page, done) = {
            let Some(wait) = self.memory_wait.front_mut() else {
                return;
            };
            wait.ticks_remaining = wait.ticks_remaining.saturating_sub(1);
            (wait.pid, wait.page, wait.ticks_remaining == 0)
        };

        // Disk wait is attributed to the process as I/O time.
        if let Some(p) = self.process(pid) {
            p.add_io_time(1);
        }

        if done {
            self.memory_wait.pop_front();
            if let Some(mem) = self.memory.as_deref() {
                mem.complete_page_load(pid, page);
            }
            if let Some(p) = self.process(pid) {
                p.reset_quantum();
                p.set_state(ProcessState::Ready, now);
            }
            self.enqueue_ready(pid);
            info!(target: "mem", tick = now, %pid, page, "page fault resolved");
        }
    }

    /// Execute one tick of the running process, if any.
    fn handle_cpu_execution(&mut self, now: Tick) {
        let Some(pid) = self.running else {
            return;
        };

        // Instruction fetch: ask the paging policy for the page under the
        // instruction pointer.
        let page = match self.process(pid) {
            Some(p) => p.current_page_requirement(),
            None => {
                self.running = None;
                return;
            }
        };
        let request = self
            .memory
            .as_deref()
            .map_or(crate::domain::memory::PageRequest::Hit, |m| {
                m.request_page(pid, page)
            });

        if !request.is_hit() {
            // Fault: the tick is spent on the failed instruction attempt
            // and the CPU is yielded immediately.
            warn!(target: "mem", tick = now, %pid, page, "page fault during execution");
            if let Some(p) = self.process(pid) {
                p.record_page_fault();
                p.set_state(ProcessState::WaitingMemory, now);
            }
            self.total_page_faults += 1;
            self.memory_wait.push_back(MemoryWait {
                pid,
                page,
                ticks_remaining: self.config.page_fault_penalty,
            });
            self.running = None;
            return;
        }

        // Hit: wake the worker for exactly one tick of burst work and
        // block at the completion barrier.
        match self.process(pid) {
            Some(p) => {
                self.monitor.dispatch(p);
                self.monitor.wait_for_burst_completion(p);
                p.add_cpu_time(1);
                p.increment_quantum(1);
            }
            None => {
                self.running = None;
                return;
            }
        }
        self.cpu_active_ticks += 1;
        if let Some(mem) = self.memory.as_deref() {
            mem.advance_instruction_pointer(pid);
        }

        let remaining = self.process(pid).map_or(0, Process::current_burst_remaining);
        if remaining == 0 {
            self.finish_current_burst(pid, now);
        } else {
            self.check_quantum(pid, now);
        }
    }

    /// The worker exhausted the current burst: terminate, block on I/O,
    /// or yield for a consecutive CPU burst.
    fn finish_current_burst(&mut self, pid: Pid, now: Tick) {
        let has_more = match self.process(pid) {
            Some(p) => {
                p.advance_to_next_burst();
                p.has_more_bursts()
            }
            None => false,
        };

        if !has_more {
            if let Some(p) = self.process(pid) {
                p.set_state(ProcessState::Terminated, now);
            }
            info!(target: "proc", tick = now, %pid, "terminated");
            if let Some(&i) = self.index.get(&pid) {
                self.processes[i].stop_worker();
            }
            if let Some(mem) = self.memory.as_deref() {
                mem.free_for_process(pid);
            }
            self.running = None;
            return;
        }

        if self.process(pid).and_then(Process::current_burst_kind) == Some(BurstKind::Io) {
            if let Some(p) = self.process(pid) {
                p.set_state(ProcessState::Blocked, now);
            }
            self.blocked.push_back(pid);
            info!(target: "wait", tick = now, %pid, "blocked on io");
            self.running = None;
        } else {
            // Consecutive CPU burst: yield so priorities and quantum get
            // re-evaluated.
            self.trigger_context_switch(Some(pid), None, now);
        }
    }

    /// Preempt the running process once its quantum is spent, for
    /// policies that have one.
    fn check_quantum(&mut self, pid: Pid, now: Tick) {
        let Some(slice) = self.scheduler.as_deref().and_then(|s| s.time_slice()) else {
            return;
        };
        let used = self.process(pid).map_or(0, Process::quantum_used);
        if used >= slice {
            info!(target: "sched", tick = now, %pid, quantum = slice, "quantum expired");
            if let Some(p) = self.process(pid) {
                p.record_preemption();
            }
            self.trigger_context_switch(Some(pid), None, now);
        }
    }

    /// Admit every process whose arrival time has come.
    fn handle_arrivals(&mut self, now: Tick) {
        while let Some(&pid) = self.incoming.front() {
            let arrival = match self.process(pid) {
                Some(p) => p.arrival_time(),
                None => {
                    self.incoming.pop_front();
                    continue;
                }
            };
            // Sorted by arrival: the first future process ends the scan.
            if arrival > now {
                break;
            }
            self.incoming.pop_front();

            if let Some(&i) = self.index.get(&pid) {
                self.processes[i].start_worker();
            }
            if let Some(mem) = self.memory.as_deref() {
                if let Some(p) = self.process(pid) {
                    mem.allocate_for_process(pid, p.required_pages());
                    mem.register_future_references(pid, p.reference_string());
                }
            }
            if let Some(p) = self.process(pid) {
                p.set_state(ProcessState::Ready, now);
            }
            self.enqueue_ready(pid);
            info!(target: "proc", tick = now, %pid, "arrived");

            // Strict-priority preemption against whoever holds, or is
            // about to hold, the CPU. The displaced process goes back to
            // ready and any pending install is cancelled; the scheduler
            // re-decides once the overhead elapses.
            let current = self.running.or(self.pending_next);
            if let Some(cur) = current {
                let new_priority = self.process(pid).map(Process::priority);
                let cur_priority = self.process(cur).map(Process::priority);
                if let (Some(new_priority), Some(cur_priority)) = (new_priority, cur_priority) {
                    if new_priority < cur_priority {
                        info!(
                            target: "sched",
                            tick = now,
                            new = %pid,
                            displaced = %cur,
                            "priority preemption",
                        );
                        self.pending_next = None;
                        self.trigger_context_switch(Some(cur), None, now);
                    }
                }
            }
        }
    }

    /// Ask the scheduler for the next process when the CPU is idle.
    /// Installation here charges no switch overhead.
    fn handle_scheduling(&mut self, now: Tick) {
        if !self.scheduler.as_deref().is_some_and(|s| s.has_ready()) {
            return;
        }
        let Some(pid) = self.scheduler.as_deref().and_then(|s| s.next()) else {
            warn!(target: "sys", tick = now, "scheduler reported ready processes but returned none");
            return;
        };
        if self.index.contains_key(&pid) {
            self.install_running(pid, now);
            debug!(target: "sched", tick = now, %pid, "dispatched without switch overhead");
        } else {
            warn!(target: "sys", tick = now, %pid, "scheduler returned unknown pid");
        }
    }

    /// Move `current` (if live) back to ready and either charge switch
    /// overhead or install `next` directly.
    ///
    /// Overhead applies only when a live process is displaced. An idle
    /// CPU or a terminated predecessor makes the hand-over free.
    fn trigger_context_switch(&mut self, current: Option<Pid>, next: Option<Pid>, now: Tick) {
        let is_preemption = current.is_some_and(|pid| {
            self.process(pid)
                .is_some_and(|p| p.state() != ProcessState::Terminated)
        });

        if let Some(cur) = current {
            if let Some(p) = self.process(cur) {
                p.reset_quantum();
                p.set_state(ProcessState::Ready, now);
            }
            self.enqueue_ready(cur);
        }
        self.running = None;

        if is_preemption {
            self.total_context_switches += 1;
            if self.config.context_switch_overhead == 0 {
                // Zero overhead: no idle tick between tenures.
                self.pending_next = None;
                self.switch_ticks_remaining = 0;
                if let Some(nxt) = next {
                    self.install_running(nxt, now);
                }
            } else {
                self.pending_next = next;
                self.switch_ticks_remaining = self.config.context_switch_overhead;
                debug!(
                    target: "sched",
                    tick = now,
                    overhead = self.config.context_switch_overhead,
                    "context switch overhead started",
                );
            }
        } else {
            self.switch_ticks_remaining = 0;
            self.pending_next = None;
            if let Some(nxt) = next {
                self.install_running(nxt, now);
            }
        }
    }

    fn install_running(&mut self, pid: Pid, now: Tick) {
        if let Some(p) = self.process(pid) {
            p.set_state(ProcessState::Running, now);
            self.running = Some(pid);
        }
    }

    fn enqueue_ready(&self, pid: Pid) {
        let (Some(p), Some(sched)) = (self.process(pid), self.scheduler.as_deref()) else {
            return;
        };
        sched.add(ReadyEntry {
            pid,
            priority: p.priority(),
            burst_remaining: p.current_burst_remaining(),
        });
    }

    fn update_metrics(&mut self, now: Tick) {
        self.metrics.current_tick = now;
        self.metrics.total_processes = self.processes.len();
        self.metrics.total_page_faults = self.total_page_faults;
        self.metrics.total_context_switches = self.total_context_switches;
        self.metrics.cpu_utilization = if now > 0 {
            self.cpu_active_ticks as f64 / now as f64
        } else {
            0.0
        };

        let mut completed = 0usize;
        let mut total_wait = 0.0;
        let mut total_turnaround = 0.0;
        for p in &self.processes {
            if p.state() == ProcessState::Terminated {
                completed += 1;
                let stats = p.stats();
                total_wait += stats.total_wait_time as f64;
                let finish = stats.finish_time.unwrap_or(0);
                total_turnaround += finish.saturating_sub(p.arrival_time()) as f64;
            }
        }
        self.metrics.completed_processes = completed;
        if completed > 0 {
            self.metrics.avg_wait_time = total_wait / completed as f64;
            self.metrics.avg_turnaround_time = total_turnaround / completed as f64;
        } else {
            self.metrics.avg_wait_time = 0.0;
            self.metrics.avg_turnaround_time = 0.0;
        }
    }

    /// Join all workers, drop the process store, and clear queues,
    /// accumulators, the clock, and policy state.
    fn clear_run_state(&mut self) {
        for p in &mut self.processes {
            p.stop_worker();
        }
        self.processes.clear();
        self.index.clear();
        self.incoming.clear();
        self.blocked.clear();
        self.memory_wait.clear();
        self.running = None;
        self.pending_next = None;
        self.switch_ticks_remaining = 0;
        self.cpu_active_ticks = 0;
        self.total_page_faults = 0;
        self.total_context_switches = 0;
        self.metrics = SimulatorMetrics::default();
        self.clock.reset();
        if let Some(sched) = self.scheduler.as_deref() {
            sched.reset();
        }
        if let Some(mem) = self.memory.as_deref() {
            mem.reset();
        }
    }

    fn process(&self, pid: Pid) -> Option<&Process> {
        self.index.get(&pid).map(|&i| &self.processes[i])
    }

    // ------------------------------------------------------------------
    // Snapshot accessors (the observer contract)
    // ------------------------------------------------------------------

    /// Whether externally driven ticks currently advance the simulation.
    pub fn is_running(&self) -> bool {
        self.active
    }

    /// Current simulation time.
    pub fn current_time(&self) -> Tick {
        self.clock.now()
    }

    /// Read-only handle onto the kernel clock, for wiring memory
    /// managers.
    pub fn clock_handle(&self) -> ClockHandle {
        self.clock.handle()
    }

    /// Snapshots of every loaded process.
    pub fn all_processes(&self) -> Vec<ProcessSnapshot> {
        self.processes.iter().map(Process::snapshot).collect()
    }

    /// Snapshot of the CPU holder, if any.
    pub fn running_process(&self) -> Option<ProcessSnapshot> {
        self.running
            .and_then(|pid| self.process(pid))
            .map(Process::snapshot)
    }

    /// Snapshots of the ready queue, in the scheduler's selection order.
    pub fn ready_processes(&self) -> Vec<ProcessSnapshot> {
        self.scheduler.as_deref().map_or_else(Vec::new, |sched| {
            sched
                .peek_ready()
                .iter()
                .filter_map(|&pid| self.process(pid))
                .map(Process::snapshot)
                .collect()
        })
    }

    /// Snapshots of the blocked (I/O) queue, in order.
    pub fn blocked_processes(&self) -> Vec<ProcessSnapshot> {
        self.blocked
            .iter()
            .filter_map(|&pid| self.process(pid))
            .map(Process::snapshot)
            .collect()
    }

    /// The memory-wait queue, in order.
    pub fn memory_wait_queue(&self) -> Vec<MemoryWaitSnapshot> {
        self.memory_wait
            .iter()
            .map(|w| MemoryWaitSnapshot {
                pid: w.pid,
                page_number: w.page,
                ticks_remaining: w.ticks_remaining,
            })
            .collect()
    }

    /// Physical frame status, empty before a memory manager is set.
    pub fn frame_status(&self) -> Vec<FrameSnapshot> {
        self.memory
            .as_deref()
            .map_or_else(Vec::new, |m| m.frame_status())
    }

    /// Page table of `pid`, empty before a memory manager is set.
    pub fn page_table_for_process(&self, pid: Pid) -> Vec<PageTableEntrySnapshot> {
        self.memory
            .as_deref()
            .map_or_else(Vec::new, |m| m.page_table_for_process(pid))
    }

    /// Memory statistics, zeroed before a memory manager is set.
    pub fn memory_stats(&self) -> MemoryStats {
        self.memory
            .as_deref()
            .map_or_else(MemoryStats::default, |m| m.stats())
    }

    /// Scheduler metrics, zeroed before a scheduler is set.
    pub fn scheduler_metrics(&self) -> SchedulerMetrics {
        self.scheduler
            .as_deref()
            .map_or_else(SchedulerMetrics::default, |s| s.metrics())
    }

    /// Name of the injected scheduler, or `"None"`.
    pub fn scheduler_name(&self) -> String {
        self.scheduler
            .as_deref()
            .map_or_else(|| "None".to_owned(), |s| s.name())
    }

    /// Name of the injected memory manager, or `"None"`.
    pub fn memory_manager_name(&self) -> String {
        self.memory
            .as_deref()
            .map_or_else(|| "None".to_owned(), |m| m.name())
    }

    /// Global metrics as of the end of the last tick.
    pub fn metrics(&self) -> SimulatorMetrics {
        self.metrics.clone()
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        for p in &mut self.processes {
            p.stop_worker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::memory::FifoMemoryManager;
    use crate::domain::process::{Burst, BurstKind};
    use crate::domain::scheduler::FcfsScheduler;

    fn descriptor(pid: u32, arrival: Tick, bursts: Vec<Burst>) -> ProcessDescriptor {
        ProcessDescriptor {
            pid: Pid::new(pid),
            arrival_time: arrival,
            priority: 1,
            required_pages: 1,
            bursts,
        }
    }

    fn cpu(d: u32) -> Burst {
        Burst::new(BurstKind::Cpu, d).unwrap()
    }

    #[test]
    fn test_start_requires_configuration() {
        let mut sim = Simulator::default();
        assert_eq!(sim.start(), Err(ConfigurationError::SchedulerMissing));

        sim.set_scheduler(Box::new(FcfsScheduler::new()));
        assert_eq!(sim.start(), Err(ConfigurationError::MemoryManagerMissing));

        let handle = sim.clock_handle();
        sim.set_memory_manager(Box::new(FifoMemoryManager::new(4, handle)));
        assert_eq!(sim.start(), Err(ConfigurationError::NoProcesses));

        sim.load_processes(vec![descriptor(1, 0, vec![cpu(1)])]);
        assert!(sim.start().is_ok());
        assert!(sim.is_running());
    }

    #[test]
    fn test_accessors_safe_before_configuration() {
        let sim = Simulator::default();
        assert!(sim.all_processes().is_empty());
        assert!(sim.running_process().is_none());
        assert!(sim.ready_processes().is_empty());
        assert!(sim.frame_status().is_empty());
        assert_eq!(sim.scheduler_name(), "None");
        assert_eq!(sim.memory_manager_name(), "None");
        assert_eq!(sim.memory_stats().total_frames, 0);
    }

    #[test]
    fn test_load_rejects_invalid_descriptors() {
        let mut sim = Simulator::default();
        let loaded = sim.load_processes(vec![
            descriptor(1, 0, vec![cpu(1)]),
            descriptor(0, 0, vec![cpu(1)]), // pid 0 rejected
            descriptor(1, 0, vec![cpu(1)]), // duplicate rejected
            descriptor(2, 0, vec![]),       // no bursts rejected
        ]);
        assert_eq!(loaded, 1);
    }

    #[test]
    fn test_tick_without_start_needs_force() {
        let mut sim = Simulator::default();
        sim.tick(false);
        assert_eq!(sim.current_time(), 0);
        sim.tick(true);
        assert_eq!(sim.current_time(), 1);
    }

    #[test]
    fn test_fault_then_run_to_completion() {
        // One process, one page, CPU(2). Tick 1 faults on the first
        // access, ticks 2..=6 pay the penalty, tick 6 re-queues it, and
        // ticks 7 and 8 execute. Finish at tick 8.
        let mut sim = Simulator::default();
        sim.load_processes(vec![descriptor(1, 0, vec![cpu(2)])]);
        sim.set_scheduler(Box::new(FcfsScheduler::new()));
        let handle = sim.clock_handle();
        sim.set_memory_manager(Box::new(FifoMemoryManager::new(4, handle)));
        sim.start().unwrap();

        for _ in 0..20 {
            sim.tick(false);
            if sim.metrics().completed_processes == 1 {
                break;
            }
        }

        let snap = &sim.all_processes()[0];
        assert_eq!(snap.state, ProcessState::Terminated);
        assert_eq!(snap.stats.finish_time, Some(8));
        assert_eq!(snap.stats.total_cpu_time, 2);
        assert_eq!(snap.stats.total_io_time, 5);
        assert_eq!(snap.stats.page_faults, 1);
        assert_eq!(sim.metrics().total_page_faults, 1);
    }

    #[test]
    fn test_reset_is_idempotent_and_clears() {
        let mut sim = Simulator::default();
        sim.load_processes(vec![descriptor(1, 0, vec![cpu(3)])]);
        sim.set_scheduler(Box::new(FcfsScheduler::new()));
        let handle = sim.clock_handle();
        sim.set_memory_manager(Box::new(FifoMemoryManager::new(2, handle)));
        sim.start().unwrap();
        sim.tick(false);
        sim.tick(false);

        sim.reset();
        assert_eq!(sim.current_time(), 0);
        assert!(sim.all_processes().is_empty());
        assert!(!sim.is_running());

        sim.reset();
        assert_eq!(sim.current_time(), 0);
    }
}
