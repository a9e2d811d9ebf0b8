//! `WaveSchedule` — the step → generator map owned by a producer.
//!
//! `BTreeMap` keeps steps ordered, so "is there anything still to come" is a
//! single range probe rather than a scan of every entry.

use std::collections::BTreeMap;
use std::ops::Bound;

use ss_core::Step;

use crate::WaveGenerator;

/// Maps simulation steps to the generator that fires at that step.
/// At most one generator per step.
#[derive(Default)]
pub struct WaveSchedule {
    inner: BTreeMap<Step, Box<dyn WaveGenerator>>,
}

impl WaveSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `generator` at `step`, replacing (and returning) whatever was
    /// registered there before.
    pub fn insert(
        &mut self,
        step:      Step,
        generator: Box<dyn WaveGenerator>,
    ) -> Option<Box<dyn WaveGenerator>> {
        self.inner.insert(step, generator)
    }

    /// The generator registered at exactly `step`.
    pub fn get(&self, step: Step) -> Option<&dyn WaveGenerator> {
        self.inner.get(&step).map(|g| g.as_ref())
    }

    /// `true` if a wave is registered at any step strictly after `step`.
    pub fn has_wave_after(&self, step: Step) -> bool {
        self.inner
            .range((Bound::Excluded(step), Bound::Unbounded))
            .next()
            .is_some()
    }

    /// The latest registered step, or `None` if empty.
    pub fn last_step(&self) -> Option<Step> {
        self.inner.keys().next_back().copied()
    }

    /// Registered steps in ascending order.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.inner.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for WaveSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveSchedule")
            .field("steps", &self.inner.keys().collect::<Vec<_>>())
            .finish()
    }
}
