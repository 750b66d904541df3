//! Page-Reference String Generation
//!
//! Each process receives, at construction, the full sequence of logical
//! pages it will touch: one page per tick of CPU work. The walk models
//! temporal locality with a fixed repeat probability and is seeded from the
//! pid alone, so two processes with the same pid always produce identical
//! sequences and a run can be replayed bit-for-bit.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{PageNumber, Pid};

/// Probability that an access repeats the previously touched page.
pub const LOCALITY_PROBABILITY: f64 = 0.7;

/// Generate the reference string for a process.
///
/// # Arguments
///
/// - `pid`: seeds the generator; the only source of randomness.
/// - `required_pages`: pages are drawn from `[0, required_pages)`.
/// - `total_cpu_ticks`: length of the resulting sequence, one entry per
///   tick of CPU burst.
///
/// # Algorithm
///
/// A locality walk starting at page 0. At each step the previous page is
/// repeated with probability [`LOCALITY_PROBABILITY`]; otherwise the walk
/// jumps to a page drawn uniformly from the process's address space.
pub fn generate(pid: Pid, required_pages: usize, total_cpu_ticks: usize) -> Vec<PageNumber> {
    debug_assert!(required_pages > 0, "reference walk needs a page to land on");

    let mut rng = SmallRng::seed_from_u64(u64::from(pid.as_u32()));
    let mut sequence = Vec::with_capacity(total_cpu_ticks);
    let mut current: PageNumber = 0;

    for _ in 0..total_cpu_ticks {
        if rng.gen::<f64>() >= LOCALITY_PROBABILITY {
            current = rng.gen_range(0..required_pages);
        }
        sequence.push(current);
    }

    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_matches_cpu_ticks() {
        let refs = generate(Pid::new(1), 8, 40);
        assert_eq!(refs.len(), 40);
    }

    #[test]
    fn test_pages_stay_in_bounds() {
        let refs = generate(Pid::new(3), 5, 200);
        assert!(refs.iter().all(|&page| page < 5));
    }

    #[test]
    fn test_same_pid_same_sequence() {
        let a = generate(Pid::new(100), 10, 50);
        let b = generate(Pid::new(100), 10, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_pids_diverge() {
        let a = generate(Pid::new(100), 10, 50);
        let b = generate(Pid::new(101), 10, 50);
        assert_ne!(a, b);
    }

    #[test]
    fn test_locality_dominates() {
        // With a 0.7 repeat probability, well over half of consecutive
        // pairs should be equal on any long walk.
        let refs = generate(Pid::new(7), 16, 1000);
        let repeats = refs.windows(2).filter(|w| w[0] == w[1]).count();
        assert!(repeats > refs.len() / 2, "repeats = {repeats}");
    }

    #[test]
    fn test_single_page_process_never_leaves_it() {
        let refs = generate(Pid::new(9), 1, 30);
        assert!(refs.iter().all(|&page| page == 0));
    }

    #[test]
    fn test_empty_when_no_cpu_work() {
        assert!(generate(Pid::new(2), 4, 0).is_empty());
    }
}
