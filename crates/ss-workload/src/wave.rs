//! `WaveGenerator` — produces the batch of tasks for one arrival event.
//!
//! Generators are registered on a producer's [`WaveSchedule`][crate::WaveSchedule]
//! and invoked once, at the step they are registered for.  They draw fresh
//! task ids from the run's [`TaskIdSource`] and any randomness from the run's
//! [`SimRng`], so a given seed always yields the same waves.
//!
//! Generators are *composable*: join two with [`WaveGeneratorExt::and`] to
//! emit both batches in one wave.

use ss_core::{SimRng, Task, TaskIdSource};

use crate::{WorkloadError, WorkloadResult};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Produces one wave of tasks.
///
/// # Contract
///
/// - Must be deterministic given the same `rng` state.
/// - Must allocate every task id from `ids` (ids stay unique per run).
/// - Must not block or perform I/O.
pub trait WaveGenerator {
    /// Generate the tasks of one wave, in submission order.
    fn generate(&self, ids: &mut TaskIdSource, rng: &mut SimRng) -> Vec<Task>;
}

// ── Fixed sizes ───────────────────────────────────────────────────────────────

/// Emits one task per listed size, in list order.  No randomness.
#[derive(Clone, Debug)]
pub struct FixedWave {
    sizes: Vec<u64>,
}

impl FixedWave {
    pub fn new(sizes: Vec<u64>) -> Self {
        Self { sizes }
    }

    /// `count` tasks of identical size.
    pub fn uniform(count: usize, units: u64) -> Self {
        Self { sizes: vec![units; count] }
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }
}

impl WaveGenerator for FixedWave {
    fn generate(&self, ids: &mut TaskIdSource, _rng: &mut SimRng) -> Vec<Task> {
        self.sizes.iter().map(|&units| ids.task(units)).collect()
    }
}

// ── Uniform random sizes ──────────────────────────────────────────────────────

/// Emits `count` tasks with sizes drawn uniformly from `min_units..=max_units`.
#[derive(Clone, Debug)]
pub struct UniformWave {
    count:     usize,
    min_units: u64,
    max_units: u64,
}

impl UniformWave {
    pub fn new(count: usize, min_units: u64, max_units: u64) -> WorkloadResult<Self> {
        if min_units > max_units {
            return Err(WorkloadError::InvalidRange { min: min_units, max: max_units });
        }
        Ok(Self { count, min_units, max_units })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl WaveGenerator for UniformWave {
    fn generate(&self, ids: &mut TaskIdSource, rng: &mut SimRng) -> Vec<Task> {
        (0..self.count)
            .map(|_| {
                let units = rng.gen_range(self.min_units..=self.max_units);
                ids.task(units)
            })
            .collect()
    }
}

// ── Combination ───────────────────────────────────────────────────────────────

/// Emits the tasks of `first` followed by the tasks of `second`.
pub struct CombinedWave<A: WaveGenerator, B: WaveGenerator> {
    first:  A,
    second: B,
}

impl<A: WaveGenerator, B: WaveGenerator> WaveGenerator for CombinedWave<A, B> {
    fn generate(&self, ids: &mut TaskIdSource, rng: &mut SimRng) -> Vec<Task> {
        let mut tasks = self.first.generate(ids, rng);
        tasks.extend(self.second.generate(ids, rng));
        tasks
    }
}

/// Extension trait that adds `.and(other)` to any `WaveGenerator`.
pub trait WaveGeneratorExt: WaveGenerator + Sized {
    fn and<B: WaveGenerator>(self, other: B) -> CombinedWave<Self, B> {
        CombinedWave { first: self, second: other }
    }
}

impl<G: WaveGenerator + Sized> WaveGeneratorExt for G {}
