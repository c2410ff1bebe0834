//! Report probability for a fixed true count.

use crate::config::{validate_trials, EstimatorConfig, SuppressionConfig};
use crate::error::Result;
use crate::estimators::{run_chunked, Tally};
use crate::randomness::RandomnessSource;
use crate::result::FrequencyResult;
use crate::rule::decide;

/// Trials run and buckets reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrequencyTally {
    /// Number of trials recorded.
    pub trials: u64,
    /// Number of trials that were not suppressed.
    pub reported: u64,
}

impl FrequencyTally {
    /// Record one trial outcome.
    #[inline]
    pub fn record(&mut self, suppressed: bool) {
        self.trials += 1;
        if !suppressed {
            self.reported += 1;
        }
    }
}

impl Tally for FrequencyTally {
    fn merge(&mut self, other: Self) {
        self.trials += other.trials;
        self.reported += other.reported;
    }
}

/// Run `trials` suppression decisions for `true_count` and count the reports.
pub fn run_frequency_trials<R>(
    true_count: u64,
    config: &SuppressionConfig,
    trials: u64,
    rng: &mut R,
) -> FrequencyTally
where
    R: RandomnessSource + ?Sized,
{
    let mut tally = FrequencyTally::default();
    for _ in 0..trials {
        tally.record(decide(true_count, config, rng));
    }
    tally
}

/// Estimate the probability that a bucket with `true_count` entities is reported.
///
/// # Errors
///
/// Returns [`LcfError::InvalidConfiguration`](crate::LcfError::InvalidConfiguration)
/// if `trials == 0`.
pub fn estimate_report_probability<R>(
    true_count: u64,
    config: &SuppressionConfig,
    trials: u64,
    rng: &mut R,
) -> Result<FrequencyResult>
where
    R: RandomnessSource + ?Sized,
{
    validate_trials(trials)?;
    let tally = run_frequency_trials(true_count, config, trials, rng);
    Ok(finish(true_count, config, tally))
}

/// Parallel form of [`estimate_report_probability`] with seeded per-chunk streams.
pub fn estimate_report_probability_parallel(
    true_count: u64,
    config: &SuppressionConfig,
    estimator: &EstimatorConfig,
) -> Result<FrequencyResult> {
    estimator.validate()?;
    let tally = run_chunked(estimator.trials, estimator, |size, rng| {
        run_frequency_trials(true_count, config, size, rng)
    });
    Ok(finish(true_count, config, tally))
}

fn finish(true_count: u64, config: &SuppressionConfig, tally: FrequencyTally) -> FrequencyResult {
    let report_probability = tally.reported as f64 / tally.trials as f64;

    tracing::debug!(
        config = %config.label(),
        lower = config.lower_bound(),
        true_count,
        trials = tally.trials,
        reported = tally.reported,
        report_probability,
        "estimated report probability"
    );

    FrequencyResult {
        true_count,
        config: *config,
        trials: tally.trials,
        reported: tally.reported,
        report_probability,
    }
}
