//! Tick-Loop Benchmark Suite
//!
//! Baseline cost of one simulated tick across scheduler and memory
//! pressure levels. The interesting figure is ticks per second with the
//! worker rendezvous on the hot path, since every executed CPU tick costs
//! two condition-variable hand-offs.
//!
//! # Scenarios
//!
//! 1. **CPU-bound fleet**: N processes, pure CPU bursts, plenty of
//!    frames. Measures the rendezvous and scheduling overhead alone.
//! 2. **Thrashing fleet**: working sets larger than physical memory.
//!    Measures the fault path and replacement bookkeeping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tickos_sim::domain::memory::LruMemoryManager;
use tickos_sim::domain::process::{Burst, BurstKind, Pid, ProcessDescriptor};
use tickos_sim::domain::scheduler::RoundRobinScheduler;
use tickos_sim::domain::simulator::Simulator;

fn cpu_fleet(n: u32, burst: u32, pages: usize) -> Vec<ProcessDescriptor> {
    (1..=n)
        .map(|pid| ProcessDescriptor {
            pid: Pid::new(pid),
            arrival_time: 0,
            priority: 1,
            required_pages: pages,
            bursts: vec![Burst::new(BurstKind::Cpu, burst).unwrap()],
        })
        .collect()
}

fn run_to_completion(descriptors: Vec<ProcessDescriptor>, frames: usize, max_ticks: u64) -> u64 {
    let mut sim = Simulator::default();
    sim.load_processes(descriptors);
    sim.set_scheduler(Box::new(RoundRobinScheduler::new(4)));
    let handle = sim.clock_handle();
    sim.set_memory_manager(Box::new(LruMemoryManager::new(frames, handle)));
    sim.start().expect("configured");

    for _ in 0..max_ticks {
        sim.tick(false);
        let m = sim.metrics();
        if m.completed_processes == m.total_processes {
            break;
        }
    }
    sim.current_time()
}

fn bench_cpu_bound_fleet(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_cpu_bound");

    for n in [2u32, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                // One page per process and ample frames: a single fault
                // each, then pure execution.
                let ticks = run_to_completion(cpu_fleet(n, 20, 1), 16, 10_000);
                black_box(ticks)
            });
        });
    }

    group.finish();
}

fn bench_thrashing_fleet(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_thrashing");

    for n in [2u32, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                // Working sets of 6 pages against 3 frames keep the
                // replacement path hot.
                let ticks = run_to_completion(cpu_fleet(n, 20, 6), 3, 50_000);
                black_box(ticks)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cpu_bound_fleet, bench_thrashing_fleet);
criterion_main!(benches);
