//! Default parameters used throughout the crate.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same inputs = same tallies. The value `0x6C6366` is "lcf"
/// encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x6C6366;

/// Default number of trials per estimation.
///
/// Sampling error of a proportion is at most `0.5 / sqrt(trials)`, about
/// 0.0016 at this setting.
pub const DEFAULT_TRIALS: u64 = 100_000;

/// Default hard lower bound of the threshold distribution.
pub const DEFAULT_LOWER_BOUND: f64 = 1.5;

/// Number of independent trial chunks used by the parallel estimators.
///
/// Fixed rather than derived from the thread count so results do not depend
/// on the machine they run on.
pub const DEFAULT_PARALLEL_CHUNKS: usize = 64;
