//! The randomized suppression decision for a single bucket.

use crate::config::SuppressionConfig;
use crate::randomness::RandomnessSource;

/// Draw one threshold: `Normal(mean, sd)` clamped to `[lower_bound, upper_bound]`.
#[inline]
pub fn draw_threshold<R>(config: &SuppressionConfig, rng: &mut R) -> f64
where
    R: RandomnessSource + ?Sized,
{
    let threshold = rng.gaussian(config.mean(), config.standard_deviation());
    threshold.max(config.lower_bound()).min(config.upper_bound())
}

/// Decide whether a bucket with `true_count` distinct entities is suppressed.
///
/// Consumes exactly one Gaussian draw. Pure apart from the randomness stream,
/// so independent streams can call it concurrently.
#[inline]
pub fn decide<R>(true_count: u64, config: &SuppressionConfig, rng: &mut R) -> bool
where
    R: RandomnessSource + ?Sized,
{
    let threshold = draw_threshold(config, rng);
    config.comparator().suppresses(true_count as f64, threshold)
}
