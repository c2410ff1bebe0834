//! Configuration for suppression estimation.
//!
//! Two pieces of configuration flow through every estimator:
//!
//! - [`SuppressionConfig`]: the threshold distribution of one LCF setting
//!   (lower bound, mean, standard deviation, and the derived upper bound) plus
//!   the comparison operator.
//! - [`EstimatorConfig`]: how many trials to run and how to seed them.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PARALLEL_CHUNKS, DEFAULT_SEED, DEFAULT_TRIALS};
use crate::error::{LcfError, Result};

/// How the true count is compared against the drawn threshold.
///
/// The two policies differ only when the count equals the clamped threshold,
/// which happens with positive probability whenever the threshold is clamped
/// to an integer bound or the standard deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparator {
    /// Suppress when `count < threshold`.
    #[default]
    Strict,
    /// Suppress when `count <= threshold`.
    NonStrict,
}

impl Comparator {
    /// Returns true if a bucket with `count` distinct entities is suppressed.
    #[inline]
    pub fn suppresses(self, count: f64, threshold: f64) -> bool {
        match self {
            Comparator::Strict => count < threshold,
            Comparator::NonStrict => count <= threshold,
        }
    }

    /// Short name for tables and file names.
    pub fn name(self) -> &'static str {
        match self {
            Comparator::Strict => "strict",
            Comparator::NonStrict => "non-strict",
        }
    }

    /// Parse a comparator name as accepted on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" | "lt" | "<" => Some(Comparator::Strict),
            "non-strict" | "nonstrict" | "le" | "<=" => Some(Comparator::NonStrict),
            _ => None,
        }
    }
}

/// Threshold distribution of one LCF setting.
///
/// The threshold is drawn from `Normal(mean, standard_deviation)` and clamped
/// to `[lower_bound, upper_bound]`, where `upper_bound` is the reflection of
/// `lower_bound` around `mean`. Fields are private so the symmetry
/// `upper_bound - mean == mean - lower_bound` holds for every value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuppressionConfig {
    lower_bound: f64,
    mean: f64,
    standard_deviation: f64,
    upper_bound: f64,
    comparator: Comparator,
}

impl SuppressionConfig {
    /// Create a validated configuration with the default (strict) comparator.
    ///
    /// # Errors
    ///
    /// Returns [`LcfError::InvalidConfiguration`] if any value is non-finite,
    /// `lower_bound < 0`, `standard_deviation < 0`, or `mean < lower_bound`
    /// (which would make `upper_bound < lower_bound`).
    pub fn new(lower_bound: f64, mean: f64, standard_deviation: f64) -> Result<Self> {
        if !lower_bound.is_finite() {
            return Err(LcfError::invalid("lower_bound", "must be finite"));
        }
        if !mean.is_finite() {
            return Err(LcfError::invalid("mean", "must be finite"));
        }
        if !standard_deviation.is_finite() {
            return Err(LcfError::invalid("standard_deviation", "must be finite"));
        }
        if lower_bound < 0.0 {
            return Err(LcfError::invalid(
                "lower_bound",
                format!("must be >= 0, got {lower_bound}"),
            ));
        }
        if standard_deviation < 0.0 {
            return Err(LcfError::invalid(
                "standard_deviation",
                format!("must be >= 0, got {standard_deviation}"),
            ));
        }
        if mean < lower_bound {
            return Err(LcfError::invalid(
                "mean",
                format!(
                    "must be >= lower_bound ({lower_bound}), got {mean}; upper_bound would fall below lower_bound"
                ),
            ));
        }

        Ok(Self {
            lower_bound,
            mean,
            standard_deviation,
            upper_bound: mean + (mean - lower_bound),
            comparator: Comparator::default(),
        })
    }

    /// Replace the comparison operator.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Hard lower bound of the threshold.
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Mean of the unclamped threshold distribution.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation of the unclamped threshold distribution.
    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    /// Upper clamp, `mean + (mean - lower_bound)`.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Comparison operator used by the suppression rule.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Label in the `(mean,sd)` form used by result tables.
    pub fn label(&self) -> String {
        format!("({:.1},{:?})", self.mean, self.standard_deviation)
    }
}

/// Trial budget and seeding for one estimation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of simulated buckets per estimation. Must be > 0.
    pub trials: u64,

    /// Base seed for the deterministic per-chunk random streams.
    pub seed: u64,

    /// Number of independent trial chunks for the parallel estimators.
    ///
    /// Results depend on this value (each chunk owns its own stream) but not
    /// on the number of threads that execute the chunks.
    pub parallel_chunks: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            parallel_chunks: DEFAULT_PARALLEL_CHUNKS,
        }
    }
}

impl EstimatorConfig {
    /// Set the number of trials.
    pub fn trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    /// Set the base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of trial chunks for the parallel estimators.
    pub fn parallel_chunks(mut self, chunks: usize) -> Self {
        self.parallel_chunks = chunks;
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        validate_trials(self.trials)?;
        if self.parallel_chunks == 0 {
            return Err(LcfError::invalid("parallel_chunks", "must be > 0"));
        }
        Ok(())
    }
}

pub(crate) fn validate_trials(trials: u64) -> Result<()> {
    if trials == 0 {
        return Err(LcfError::invalid("trials", "must be > 0"));
    }
    Ok(())
}
