//! Randomness consumed by the estimators.
//!
//! Estimators never touch a process-wide generator. Every call takes an
//! explicit source, and parallel code derives one independent stream per
//! chunk or work item from a base seed with [`worker_rng`].

use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Source of the two kinds of randomness the suppression model needs.
///
/// Implemented for every [`rand::Rng`]; tests can implement it directly to
/// script exact draws.
pub trait RandomnessSource {
    /// Draw from `Normal(mean, standard_deviation)`.
    ///
    /// A zero standard deviation returns `mean` exactly.
    fn gaussian(&mut self, mean: f64, standard_deviation: f64) -> f64;

    /// Draw uniformly from `low..high` (high exclusive). Requires `low < high`.
    fn uniform_integer(&mut self, low: u64, high: u64) -> u64;
}

impl<R: Rng + ?Sized> RandomnessSource for R {
    #[inline]
    fn gaussian(&mut self, mean: f64, standard_deviation: f64) -> f64 {
        let z: f64 = self.sample(StandardNormal);
        mean + standard_deviation * z
    }

    #[inline]
    fn uniform_integer(&mut self, low: u64, high: u64) -> u64 {
        self.random_range(low..high)
    }
}

/// Derive a well-mixed seed for stream `counter` from a base seed.
///
/// SplitMix64 finaliser applied to `seed + counter * golden_gamma`, so
/// neighbouring counters give unrelated streams.
#[inline]
pub fn counter_rng_seed(seed: u64, counter: u64) -> u64 {
    let mut z = seed.wrapping_add(counter.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic generator for stream `stream` under base seed `seed`.
pub fn worker_rng(seed: u64, stream: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, stream))
}
