//! The unit of work moved through the entity tree.

use crate::TaskId;

/// An atomic unit of work.
///
/// `remaining_units` only ever decreases, and only through
/// [`execute`][Self::execute].  A `Task` is moved (never cloned) from node to
/// node, so exactly one node owns it at any time.
#[derive(Debug, PartialEq, Eq)]
pub struct Task {
    id:              TaskId,
    remaining_units: u64,
}

impl Task {
    pub fn new(id: TaskId, units: u64) -> Self {
        Self { id, remaining_units: units }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn remaining_units(&self) -> u64 {
        self.remaining_units
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining_units == 0
    }

    /// Spend up to `budget` units of work on this task.
    ///
    /// Returns the units actually consumed (`min(budget, remaining)`).
    pub fn execute(&mut self, budget: u64) -> u64 {
        let spent = budget.min(self.remaining_units);
        self.remaining_units -= spent;
        spent
    }
}

/// Hands out unique, monotonically increasing `TaskId`s for one run.
#[derive(Debug, Default)]
pub struct TaskIdSource {
    next: u64,
}

impl TaskIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    #[inline]
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }

    /// Convenience: allocate an id and wrap it in a task of `units`.
    #[inline]
    pub fn task(&mut self, units: u64) -> Task {
        Task::new(self.next_id(), units)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
