//! Result types produced by the estimators.
//!
//! Estimates are approximations with sampling error on the order of
//! `1 / sqrt(trials)`. Integer tallies are kept alongside the derived
//! proportions so callers can recompute or combine them exactly.

use serde::Serialize;

use crate::config::SuppressionConfig;

/// Estimated report probability for one true count under one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResult {
    /// True number of distinct entities in the simulated bucket.
    pub true_count: u64,
    /// Configuration the trials were run with.
    pub config: SuppressionConfig,
    /// Number of trials run.
    pub trials: u64,
    /// Number of trials in which the bucket was reported.
    pub reported: u64,
    /// `reported / trials`, in `[0, 1]`.
    pub report_probability: f64,
}

/// A conditional probability that may lack a conditioning event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConditionalEstimate {
    /// The conditioning event was observed at least once.
    Observed(f64),
    /// The conditioning event never occurred; treated as certainty.
    InsufficientSamples,
}

impl ConditionalEstimate {
    /// Numeric value, with [`ConditionalEstimate::InsufficientSamples`] read as `1.0`.
    pub fn value(&self) -> f64 {
        match self {
            ConditionalEstimate::Observed(p) => *p,
            ConditionalEstimate::InsufficientSamples => 1.0,
        }
    }

    /// True if the conditioning event never occurred.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, ConditionalEstimate::InsufficientSamples)
    }
}

/// How often a bucket was reported, as an exact ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportRate {
    /// `reported` of `trials` buckets were reported (`reported > 0`).
    Observed {
        /// Number of reported trials.
        reported: u64,
        /// Total trials.
        trials: u64,
    },
    /// No bucket was reported: the rate is below `1 / trials`.
    BelowResolution {
        /// Total trials.
        trials: u64,
    },
}

impl ReportRate {
    /// Build the rate from raw counts.
    pub fn from_counts(reported: u64, trials: u64) -> Self {
        if reported == 0 {
            ReportRate::BelowResolution { trials }
        } else {
            ReportRate::Observed { reported, trials }
        }
    }

    /// Rate as a proportion, or `None` when below resolution.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            ReportRate::Observed { reported, trials } => Some(*reported as f64 / *trials as f64),
            ReportRate::BelowResolution { .. } => None,
        }
    }

    /// Integer `k` such that the rate is roughly `1/k` (`trials / reported`,
    /// truncated), or `None` when below resolution.
    pub fn one_in(&self) -> Option<u64> {
        match self {
            ReportRate::Observed { reported, trials } => Some(trials / reported),
            ReportRate::BelowResolution { .. } => None,
        }
    }

    /// True when no bucket was reported.
    pub fn is_below_resolution(&self) -> bool {
        matches!(self, ReportRate::BelowResolution { .. })
    }
}

/// Outcome of the adjacent-pair experiment for counts `(n, n + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjacencyResult {
    /// Configuration the trials were run with.
    pub config: SuppressionConfig,
    /// Lower count of the adjacent pair.
    pub n: u64,
    /// Number of trials run.
    pub trials: u64,
    /// Buckets suppressed.
    pub num_suppressed: u64,
    /// Buckets reported. `num_suppressed + num_reported == trials`.
    pub num_reported: u64,
    /// P(true count = n | suppressed).
    pub prob_n_given_suppressed: f64,
    /// P(true count = n + 1 | reported).
    pub prob_n_plus_1_given_reported: ConditionalEstimate,
    /// Fraction of buckets reported.
    pub report_rate: ReportRate,
}
