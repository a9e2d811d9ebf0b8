//! Root node that injects waves of tasks into the tree.

use ss_core::Step;
use ss_workload::{WaveGenerator, WaveSchedule};

/// Holds a wave schedule and counts the tasks it has submitted.
///
/// A producer has at most one child (enforced by
/// [`EntityTree::add_child`][crate::EntityTree::add_child]); every wave goes
/// to that child in generation order.
#[derive(Debug, Default)]
pub struct Producer {
    pub(crate) schedule:  WaveSchedule,
    pub(crate) submitted: u64,
}

impl Producer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `generator` to fire at `step`, replacing any wave already
    /// registered there.
    pub fn add_metatask(&mut self, step: Step, generator: impl WaveGenerator + 'static) {
        self.schedule.insert(step, Box::new(generator));
    }

    /// Replace the whole schedule, e.g. with one loaded from CSV.
    pub fn set_schedule(&mut self, schedule: WaveSchedule) {
        self.schedule = schedule;
    }

    pub fn schedule(&self) -> &WaveSchedule {
        &self.schedule
    }

    pub fn tasks_submitted(&self) -> u64 {
        self.submitted
    }

    /// `true` once no wave is registered after `now`.  Says nothing about
    /// whether submitted work has finished downstream.
    pub fn is_finished(&self, now: Step) -> bool {
        !self.schedule.has_wave_after(now)
    }
}
