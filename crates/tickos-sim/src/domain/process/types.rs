//! Process Types
//!
//! Plain data shared between the process entity, the schedulers, the memory
//! managers, and the kernel: identifiers, the burst model, the lifecycle
//! state machine, and the per-process statistics record.

use std::fmt;

use serde::Serialize;

use crate::domain::clock::Tick;

/// Index of a logical page inside a process's address space.
pub type PageNumber = usize;

/// Process identifier.
///
/// Positive, unique, and stable for the lifetime of a run. The newtype
/// keeps pids from being confused with page numbers or frame ids in the
/// many `(pid, page)` signatures of the memory layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pid(u32);

impl Pid {
    /// Create a new pid. Zero is reserved and rejected at process
    /// construction, not here, so parsers can round-trip raw input.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw numeric id.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// What a burst spends its time on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BurstKind {
    /// Executing on the CPU, one reference-string access per tick.
    Cpu,
    /// Waiting on a simulated I/O device.
    Io,
}

impl fmt::Display for BurstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurstKind::Cpu => write!(f, "CPU"),
            BurstKind::Io => write!(f, "E/S"),
        }
    }
}

/// A contiguous stretch of CPU use or I/O wait, consumed one tick at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Burst {
    /// CPU or I/O.
    pub kind: BurstKind,
    /// Ticks left before the burst completes. Strictly positive at
    /// construction.
    pub remaining: u32,
}

impl Burst {
    /// Create a burst. `duration` must be strictly positive; a zero-length
    /// burst would never be observed completing by the tick loop.
    pub fn new(kind: BurstKind, duration: u32) -> Option<Self> {
        (duration > 0).then_some(Self {
            kind,
            remaining: duration,
        })
    }

    /// Consume one tick of this burst. Returns `true` once exhausted.
    pub fn consume_tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Lifecycle states of a process.
///
/// ```text
/// New --arrive--> Ready --dispatch--> Running
/// Running --quantum expired | yield--> Ready
/// Running --io burst next--> Blocked --io done--> Ready
/// Running --page fault--> WaitingMemory --load done--> Ready
/// Running --last burst done--> Terminated
/// ```
///
/// `Terminated` is absorbing: leaving it is a kernel bug and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    /// Constructed but not yet arrived.
    New,
    /// Eligible to run, waiting in a scheduler queue.
    Ready,
    /// The unique holder of the CPU.
    Running,
    /// Consuming an I/O burst.
    Blocked,
    /// Stalled on page-fault disk latency.
    WaitingMemory,
    /// All bursts consumed. Absorbing.
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::WaitingMemory => "WAITING_MEMORY",
            ProcessState::Terminated => "TERMINATED",
        };
        write!(f, "{label}")
    }
}

/// Per-process accumulators, maintained by the state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    /// Tick of the first `Ready -> Running` transition. Set exactly once.
    pub start_time: Option<Tick>,
    /// Tick of entry into `Terminated`.
    pub finish_time: Option<Tick>,
    /// Sum of intervals spent in `Ready`.
    pub total_wait_time: u64,
    /// Ticks of CPU actually executed.
    pub total_cpu_time: u64,
    /// Ticks spent on I/O bursts and page-fault disk waits.
    pub total_io_time: u64,
    /// Page faults charged to this process.
    pub page_faults: u64,
    /// Involuntary `Running -> Ready` transitions.
    pub preemptions: u64,
    /// Tick of the most recent entry into `Ready`. Internal bookkeeping for
    /// `total_wait_time`.
    pub last_ready_tick: Tick,
}

/// Everything needed to construct a process.
///
/// Produced by the process-definition parser (or built directly by tests
/// and embedders) and consumed by the kernel's `load_processes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    /// Process identifier. Must be positive.
    pub pid: Pid,
    /// Tick at which the process becomes eligible to run.
    pub arrival_time: Tick,
    /// Scheduling priority. Lower value means higher priority.
    pub priority: i32,
    /// Number of distinct logical pages the process owns. Must be positive.
    pub required_pages: usize,
    /// Ordered bursts, consumed front-first. Must be non-empty.
    pub bursts: Vec<Burst>,
}

/// Rejection reasons at process construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Pid 0 is reserved.
    InvalidPid,
    /// A process must own at least one logical page.
    NoPages {
        /// The offending pid.
        pid: Pid,
    },
    /// A process must carry at least one burst.
    NoBursts {
        /// The offending pid.
        pid: Pid,
    },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidPid => write!(f, "process id must be positive"),
            ProcessError::NoPages { pid } => {
                write!(f, "{pid} must own at least one page")
            }
            ProcessError::NoBursts { pid } => {
                write!(f, "{pid} must carry at least one burst")
            }
        }
    }
}

impl std::error::Error for ProcessError {}

/// Immutable, plain-data view of a process for observers.
///
/// Snapshots are copied out under the process lock; holding one never pins
/// live kernel state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSnapshot {
    /// Process identifier.
    pub pid: Pid,
    /// Current lifecycle state.
    pub state: ProcessState,
    /// Arrival tick.
    pub arrival_time: Tick,
    /// Scheduling priority (lower is higher).
    pub priority: i32,
    /// Logical pages owned.
    pub required_pages: usize,
    /// The burst currently at the front of the queue, if any.
    pub current_burst: Option<Burst>,
    /// Bursts not yet fully consumed, including the current one.
    pub bursts_remaining: usize,
    /// Ticks consumed under the current CPU tenure.
    pub quantum_used: u32,
    /// Position in the page-reference string.
    pub instruction_pointer: usize,
    /// Accumulated statistics.
    pub stats: ProcessStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        assert_eq!(format!("{}", Pid::new(7)), "P7");
    }

    #[test]
    fn test_burst_rejects_zero_duration() {
        assert!(Burst::new(BurstKind::Cpu, 0).is_none());
        assert!(Burst::new(BurstKind::Io, 1).is_some());
    }

    #[test]
    fn test_burst_consumption() {
        let mut burst = Burst::new(BurstKind::Cpu, 2).unwrap();
        assert!(!burst.consume_tick());
        assert!(burst.consume_tick());
        assert_eq!(burst.remaining, 0);

        // Further consumption saturates instead of wrapping.
        assert!(burst.consume_tick());
    }

    #[test]
    fn test_state_display_labels() {
        assert_eq!(ProcessState::WaitingMemory.to_string(), "WAITING_MEMORY");
        assert_eq!(ProcessState::Ready.to_string(), "READY");
    }
}
