//! Adversary advantage for adjacent counts `(n, n + 1)`.
//!
//! The adversary knows the true count is `n` or `n + 1` with equal prior
//! probability and sees only whether the bucket was suppressed. Their best
//! guess is `n` when suppressed and `n + 1` when reported; the estimator
//! measures how often each guess is right and how often a report happens.

use crate::config::{validate_trials, EstimatorConfig, SuppressionConfig};
use crate::error::{LcfError, Result};
use crate::estimators::{run_chunked, Tally};
use crate::randomness::RandomnessSource;
use crate::result::{AdjacencyResult, ConditionalEstimate, ReportRate};
use crate::rule::decide;

/// Raw counts of the adjacent-pair experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacencyTally {
    /// Buckets suppressed.
    pub num_suppressed: u64,
    /// Suppressed buckets whose true count was `n`.
    pub right_when_suppressed: u64,
    /// Buckets reported.
    pub num_reported: u64,
    /// Reported buckets whose true count was `n + 1`.
    pub right_when_reported: u64,
}

impl AdjacencyTally {
    /// Record one trial with the given true count (`n` or `n + 1`).
    #[inline]
    pub fn record(&mut self, n: u64, true_count: u64, suppressed: bool) {
        if suppressed {
            self.num_suppressed += 1;
            if true_count == n {
                self.right_when_suppressed += 1;
            }
        } else {
            self.num_reported += 1;
            if true_count != n {
                self.right_when_reported += 1;
            }
        }
    }

    /// Total trials recorded.
    pub fn trials(&self) -> u64 {
        self.num_suppressed + self.num_reported
    }
}

impl Tally for AdjacencyTally {
    fn merge(&mut self, other: Self) {
        self.num_suppressed += other.num_suppressed;
        self.right_when_suppressed += other.right_when_suppressed;
        self.num_reported += other.num_reported;
        self.right_when_reported += other.right_when_reported;
    }
}

/// Run `trials` adjacent-pair trials. Each trial draws the true count
/// uniformly from `{n, n + 1}` and then applies the suppression rule.
///
/// Callers check `n` with `validate_n` first.
pub(crate) fn run_adjacency_trials<R>(
    n: u64,
    config: &SuppressionConfig,
    trials: u64,
    rng: &mut R,
) -> AdjacencyTally
where
    R: RandomnessSource + ?Sized,
{
    let mut tally = AdjacencyTally::default();
    for _ in 0..trials {
        let true_count = rng.uniform_integer(n, n + 2);
        let suppressed = decide(true_count, config, rng);
        tally.record(n, true_count, suppressed);
    }
    tally
}

/// Estimate P(n | suppressed), P(n + 1 | reported) and the report rate.
///
/// # Errors
///
/// - [`LcfError::InvalidConfiguration`] if `trials == 0` or `n + 1` overflows.
/// - [`LcfError::NoSuppressedTrials`] if no trial was suppressed.
///
/// Zero reported trials is not an error: the result carries
/// [`ConditionalEstimate::InsufficientSamples`] and
/// [`ReportRate::BelowResolution`].
pub fn estimate_adjacent_advantage<R>(
    n: u64,
    config: &SuppressionConfig,
    trials: u64,
    rng: &mut R,
) -> Result<AdjacencyResult>
where
    R: RandomnessSource + ?Sized,
{
    validate_trials(trials)?;
    validate_n(n)?;
    let tally = run_adjacency_trials(n, config, trials, rng);
    summarize(n, config, tally)
}

/// Parallel form of [`estimate_adjacent_advantage`] with seeded per-chunk streams.
pub fn estimate_adjacent_advantage_parallel(
    n: u64,
    config: &SuppressionConfig,
    estimator: &EstimatorConfig,
) -> Result<AdjacencyResult> {
    estimator.validate()?;
    validate_n(n)?;
    let tally = run_chunked(estimator.trials, estimator, |size, rng| {
        run_adjacency_trials(n, config, size, rng)
    });
    summarize(n, config, tally)
}

/// Turn a tally into conditional probabilities.
pub fn summarize(n: u64, config: &SuppressionConfig, tally: AdjacencyTally) -> Result<AdjacencyResult> {
    let trials = tally.trials();

    if tally.num_suppressed == 0 {
        return Err(LcfError::NoSuppressedTrials { n, trials });
    }
    let prob_n_given_suppressed = tally.right_when_suppressed as f64 / tally.num_suppressed as f64;

    let prob_n_plus_1_given_reported = if tally.num_reported > 0 {
        ConditionalEstimate::Observed(tally.right_when_reported as f64 / tally.num_reported as f64)
    } else {
        tracing::warn!(
            config = %config.label(),
            n,
            trials,
            "no reported trials; report rate is below 1/{}",
            trials
        );
        ConditionalEstimate::InsufficientSamples
    };

    tracing::debug!(
        config = %config.label(),
        n,
        trials,
        num_suppressed = tally.num_suppressed,
        num_reported = tally.num_reported,
        prob_n_given_suppressed,
        "estimated adjacent-pair advantage"
    );

    Ok(AdjacencyResult {
        config: *config,
        n,
        trials,
        num_suppressed: tally.num_suppressed,
        num_reported: tally.num_reported,
        prob_n_given_suppressed,
        prob_n_plus_1_given_reported,
        report_rate: ReportRate::from_counts(tally.num_reported, trials),
    })
}

fn validate_n(n: u64) -> Result<()> {
    if n > u64::MAX - 2 {
        return Err(LcfError::invalid("n", format!("must be < {}, got {n}", u64::MAX - 1)));
    }
    Ok(())
}
