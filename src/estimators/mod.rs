//! Monte Carlo estimators built on the suppression rule.
//!
//! - [`frequency`]: probability that a bucket with a known count is reported
//! - [`adjacency`]: what an adversary learns about a count known to be `n` or `n + 1`
//!
//! Each estimator comes in two forms. The plain form takes a caller-owned
//! randomness source and runs trials sequentially. The `_parallel` form takes
//! an [`EstimatorConfig`](crate::EstimatorConfig), splits the trials into fixed
//! chunks with one derived stream each, and sums the per-chunk tallies.

pub mod adjacency;
pub mod frequency;

pub use adjacency::{
    estimate_adjacent_advantage, estimate_adjacent_advantage_parallel, AdjacencyTally,
};
pub use frequency::{
    estimate_report_probability, estimate_report_probability_parallel, run_frequency_trials,
    FrequencyTally,
};

use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::EstimatorConfig;
use crate::randomness::worker_rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Running counts that can be combined by summation.
pub trait Tally: Default + Send {
    /// Add another tally into this one.
    fn merge(&mut self, other: Self);
}

/// Split `trials` into `chunks` sizes differing by at most one.
pub(crate) fn chunk_sizes(trials: u64, chunks: usize) -> Vec<u64> {
    let chunks = chunks.max(1) as u64;
    let base = trials / chunks;
    let remainder = trials % chunks;
    (0..chunks)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&size| size > 0)
        .collect()
}

/// Run `run` once per chunk, each with its own stream, and sum the tallies.
///
/// The result depends only on `trials`, `estimator.seed` and
/// `estimator.parallel_chunks`, never on thread scheduling.
pub(crate) fn run_chunked<T, F>(trials: u64, estimator: &EstimatorConfig, run: F) -> T
where
    T: Tally,
    F: Fn(u64, &mut Xoshiro256PlusPlus) -> T + Sync,
{
    let sizes = chunk_sizes(trials, estimator.parallel_chunks);
    let seed = estimator.seed;

    #[cfg(feature = "parallel")]
    let total = sizes
        .into_par_iter()
        .enumerate()
        .map(|(i, size)| {
            let mut rng = worker_rng(seed, i as u64);
            run(size, &mut rng)
        })
        .reduce(T::default, |mut a, b| {
            a.merge(b);
            a
        });

    #[cfg(not(feature = "parallel"))]
    let total = sizes
        .into_iter()
        .enumerate()
        .fold(T::default(), |mut acc, (i, size)| {
            let mut rng = worker_rng(seed, i as u64);
            acc.merge(run(size, &mut rng));
            acc
        });

    total
}
