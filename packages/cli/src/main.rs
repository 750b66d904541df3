//! Headless driver for the tickos simulation kernel.
//!
//! Loads a process-definition file, wires the chosen scheduler and memory
//! manager, runs the tick loop to completion (or a tick budget), and
//! reports the final metrics.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use tickos_sim::domain::memory::{
    FifoMemoryManager, LruMemoryManager, MemoryManager, OptimalMemoryManager,
};
use tickos_sim::domain::scheduler::{
    FcfsScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
};
use tickos_sim::domain::simulator::{Simulator, SimulatorConfig};
use tickos_sim::infrastructure::parser;

#[derive(Parser)]
#[command(name = "tickos")]
#[command(about = "Deterministic tick-driven operating-system simulator", long_about = None)]
struct Cli {
    /// Process-definition file (one process per line).
    file: PathBuf,

    /// CPU scheduling policy.
    #[arg(long, value_enum, default_value = "fcfs")]
    scheduler: SchedulerKind,

    /// Time slice for round robin, in ticks.
    #[arg(long, default_value_t = 4)]
    quantum: u32,

    /// Page replacement policy.
    #[arg(long, value_enum, default_value = "fifo")]
    memory: MemoryKind,

    /// Frames of simulated physical memory.
    #[arg(long, default_value_t = 8)]
    frames: usize,

    /// Stop after this many ticks even if processes remain.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Disk-latency ticks charged per page fault.
    #[arg(long, default_value_t = 5)]
    fault_penalty: u32,

    /// Ticks charged per preemptive context switch.
    #[arg(long, default_value_t = 1)]
    switch_overhead: u32,

    /// Emit the final report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchedulerKind {
    Fcfs,
    Rr,
    Sjf,
    Priority,
}

#[derive(Clone, Copy, ValueEnum)]
enum MemoryKind {
    Fifo,
    Lru,
    Optimal,
}

fn build_scheduler(kind: SchedulerKind, quantum: u32) -> Box<dyn Scheduler> {
    match kind {
        SchedulerKind::Fcfs => Box::new(FcfsScheduler::new()),
        SchedulerKind::Rr => Box::new(RoundRobinScheduler::new(quantum)),
        SchedulerKind::Sjf => Box::new(SjfScheduler::new()),
        SchedulerKind::Priority => Box::new(PriorityScheduler::new()),
    }
}

fn build_memory_manager(cli: &Cli, sim: &Simulator) -> Box<dyn MemoryManager> {
    let clock = sim.clock_handle();
    match cli.memory {
        MemoryKind::Fifo => Box::new(FifoMemoryManager::new(cli.frames, clock)),
        MemoryKind::Lru => Box::new(LruMemoryManager::new(cli.frames, clock)),
        MemoryKind::Optimal => Box::new(OptimalMemoryManager::new(cli.frames, clock)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let descriptors = parser::parse_file(&cli.file)
        .with_context(|| format!("loading {}", cli.file.display()))?;
    if descriptors.is_empty() {
        bail!("{} contains no valid process definitions", cli.file.display());
    }

    let mut sim = Simulator::new(SimulatorConfig {
        page_fault_penalty: cli.fault_penalty,
        context_switch_overhead: cli.switch_overhead,
    });
    let loaded = sim.load_processes(descriptors);
    sim.set_scheduler(build_scheduler(cli.scheduler, cli.quantum));
    let memory = build_memory_manager(&cli, &sim);
    sim.set_memory_manager(memory);

    sim.start()?;
    info!(
        scheduler = %sim.scheduler_name(),
        memory = %sim.memory_manager_name(),
        processes = loaded,
        frames = cli.frames,
        "simulation configured",
    );

    for _ in 0..cli.max_ticks {
        sim.tick(false);
        let m = sim.metrics();
        if m.completed_processes == m.total_processes {
            break;
        }
    }
    sim.stop();

    let metrics = sim.metrics();
    if metrics.completed_processes < metrics.total_processes {
        info!(
            completed = metrics.completed_processes,
            total = metrics.total_processes,
            "tick budget exhausted before completion",
        );
    }

    if cli.json {
        let report = serde_json::json!({
            "metrics": metrics,
            "processes": sim.all_processes(),
            "memory": sim.memory_stats(),
            "scheduler": sim.scheduler_metrics(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&sim);
    Ok(())
}

fn print_report(sim: &Simulator) {
    let metrics = sim.metrics();

    println!();
    println!(
        "  {}  |  {}  |  {} ticks",
        sim.scheduler_name(),
        sim.memory_manager_name(),
        metrics.current_tick,
    );
    println!();
    println!("  pid   state        start  finish   wait    cpu     io  faults  preempt");
    for p in sim.all_processes() {
        let fmt_tick = |t: Option<u64>| t.map_or_else(|| "-".to_owned(), |t| t.to_string());
        println!(
            "  {:<5} {:<12} {:>6} {:>7} {:>6} {:>6} {:>6} {:>7} {:>8}",
            p.pid.to_string(),
            p.state.to_string(),
            fmt_tick(p.stats.start_time),
            fmt_tick(p.stats.finish_time),
            p.stats.total_wait_time,
            p.stats.total_cpu_time,
            p.stats.total_io_time,
            p.stats.page_faults,
            p.stats.preemptions,
        );
    }

    let memory = sim.memory_stats();
    println!();
    println!(
        "  completed     : {}/{}",
        metrics.completed_processes, metrics.total_processes,
    );
    println!("  avg wait      : {:.2} ticks", metrics.avg_wait_time);
    println!("  avg turnaround: {:.2} ticks", metrics.avg_turnaround_time);
    println!("  cpu util      : {:.1}%", metrics.cpu_utilization * 100.0);
    println!("  ctx switches  : {}", metrics.total_context_switches);
    println!(
        "  page faults   : {} ({} replacements, hit ratio {:.1}%)",
        metrics.total_page_faults,
        memory.total_replacements,
        memory.hit_ratio * 100.0,
    );
}
