//! # lcf-sim
//!
//! Monte Carlo estimation of Low Count Filter (LCF) behavior.
//!
//! An LCF hides an aggregation bucket when its count of distinct entities is
//! low. The cutoff is randomized: each bucket draws a threshold from a normal
//! distribution, clamped to `[lower_bound, 2 * mean - lower_bound]`, and the
//! bucket is suppressed when its true count falls below the threshold.
//!
//! This crate estimates two quantities used to choose LCF parameters:
//!
//! - the probability that a bucket with a given true count is reported
//!   ([`estimate_report_probability`]), and
//! - how much an adversary who knows the count is `n` or `n + 1` learns from
//!   the suppression decision ([`estimate_adjacent_advantage`]).
//!
//! ## Quick Start
//!
//! ```
//! use lcf_sim::{estimate_report_probability, worker_rng, SuppressionConfig};
//!
//! let config = SuppressionConfig::new(1.5, 4.0, 0.0).unwrap();
//! let mut rng = worker_rng(42, 0);
//! let result = estimate_report_probability(5, &config, 1_000, &mut rng).unwrap();
//! assert_eq!(result.report_probability, 1.0);
//! ```
//!
//! ## Randomness
//!
//! There is no global generator. Sequential estimators take any
//! [`RandomnessSource`] (every `rand::Rng` is one). The `_parallel` variants
//! take an [`EstimatorConfig`] and derive one stream per trial chunk, so a
//! fixed seed gives identical tallies on any number of threads.
//!
//! ## Features
//!
//! - `parallel` (default): run trial chunks on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod estimators;
pub mod randomness;
pub mod result;
pub mod rule;

pub use config::{Comparator, EstimatorConfig, SuppressionConfig};
pub use error::{LcfError, Result};
pub use estimators::{
    estimate_adjacent_advantage, estimate_adjacent_advantage_parallel,
    estimate_report_probability, estimate_report_probability_parallel, AdjacencyTally,
    FrequencyTally,
};
pub use randomness::{counter_rng_seed, worker_rng, RandomnessSource};
pub use result::{AdjacencyResult, ConditionalEstimate, FrequencyResult, ReportRate};
pub use rule::{decide, draw_threshold};
