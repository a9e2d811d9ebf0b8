//! Step-local projected completion times per child.

use std::collections::HashMap;

use ss_core::{EntityId, Task};

use crate::ChildView;

/// Committed delay per child for one scheduler step.
///
/// Seeded from each child's reported delay (work from earlier waves still in
/// flight) and raised as the step's tasks are assigned.  Dropped at the end of
/// the step.
#[derive(Debug, Default)]
pub struct CommittedDelays {
    inner: HashMap<EntityId, f64>,
}

impl CommittedDelays {
    /// Record every child's current delay as its starting point.
    pub fn snapshot(children: &[ChildView]) -> Self {
        Self {
            inner: children.iter().map(|c| (c.id, c.delay)).collect(),
        }
    }

    /// Current committed delay of `child` (0 for unknown children).
    #[inline]
    pub fn get(&self, child: EntityId) -> f64 {
        self.inner.get(&child).copied().unwrap_or(0.0)
    }

    /// Completion time of `task` if it were queued behind everything already
    /// committed to `child`.
    ///
    /// A child with no capacity never completes anything: `f64::INFINITY`.
    pub fn projected_completion(&self, task: &Task, child: &ChildView) -> f64 {
        if child.units_per_step == 0 {
            return f64::INFINITY;
        }
        task.remaining_units() as f64 / child.units_per_step as f64 + self.get(child.id)
    }

    /// Record that `child` is now busy until `completion`.
    #[inline]
    pub fn commit(&mut self, child: EntityId, completion: f64) {
        self.inner.insert(child, completion);
    }
}
