//! Error types for suppression estimation.

use thiserror::Error;

/// Errors surfaced by the estimators.
///
/// Every variant is deterministic: re-running with the same inputs and seed
/// reproduces it, so callers should not retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LcfError {
    /// A parameter violated its constraint. No trials were run.
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter (`trials`, `standard_deviation`, ...).
        parameter: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// An adjacent-pair run never suppressed, so P(n | suppressed) is undefined.
    #[error("no suppressed trials for n={n} after {trials} trials; P(n | suppressed) is undefined")]
    NoSuppressedTrials {
        /// Lower count of the adjacent pair.
        n: u64,
        /// Number of trials that were run.
        trials: u64,
    },
}

impl LcfError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        LcfError::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }

    /// Returns the parameter name for configuration errors.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            LcfError::InvalidConfiguration { parameter, .. } => Some(parameter),
            LcfError::NoSuppressedTrials { .. } => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LcfError>;
