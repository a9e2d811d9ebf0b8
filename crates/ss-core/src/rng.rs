//! Deterministic run-level RNG wrapper.
//!
//! Wave generators draw task sizes from a single `SimRng` seeded by the run's
//! `SimConfig::seed`.  The tree is stepped in a fixed order, so the sequence
//! of draws, and therefore every generated wave, is reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
