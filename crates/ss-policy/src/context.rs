//! Read-only inputs handed to a policy and the decisions it hands back.

use ss_core::{EntityId, Step, Task};

/// Snapshot of one child taken at the start of its parent's step.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ChildView {
    pub id: EntityId,

    /// Processing rate in units per step.  Zero for a scheduler that has no
    /// children of its own.
    pub units_per_step: u64,

    /// Steps until all work already committed to this child finishes.
    pub delay: f64,
}

/// Everything a policy may read while deciding one step's assignments.
///
/// Built once per scheduler step by ss-sim.  `children` is in the
/// scheduler's child order.
pub struct PolicyContext<'a> {
    /// Current simulation step.
    pub step: Step,

    /// The scheduler the policy is deciding for.
    pub scheduler: EntityId,

    /// The scheduler's children, snapshotted before any of them stepped.
    pub children: &'a [ChildView],
}

impl<'a> PolicyContext<'a> {
    #[inline]
    pub fn new(step: Step, scheduler: EntityId, children: &'a [ChildView]) -> Self {
        Self { step, scheduler, children }
    }

    /// Sum of every child's processing rate.
    pub fn total_capacity(&self) -> u64 {
        self.children.iter().map(|c| c.units_per_step).sum()
    }
}

/// One task bound to one child.
#[derive(Debug)]
pub struct Assignment {
    pub task:  Task,
    pub child: EntityId,

    /// Projected completion time of `task` on `child` when it was chosen.
    pub projected_completion: f64,
}

/// What a policy returns for one step.
///
/// A correct policy leaves `unassigned` empty; anything in it goes back to
/// the scheduler's backlog and is reported as a drain violation.
#[derive(Debug, Default)]
pub struct PolicyOutcome {
    pub assignments: Vec<Assignment>,
    pub unassigned:  Vec<Task>,
}

impl PolicyOutcome {
    /// An outcome that places nothing.
    pub fn unassigned(tasks: Vec<Task>) -> Self {
        Self { assignments: Vec::new(), unassigned: tasks }
    }
}
