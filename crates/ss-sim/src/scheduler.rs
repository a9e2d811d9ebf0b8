//! Internal node that redistributes its backlog every step.

use ss_core::Task;
use ss_policy::SchedulingPolicy;

/// Buffers accepted tasks until its next step, then hands the whole backlog
/// to its policy.
pub struct Scheduler {
    pub(crate) backlog:   Vec<Task>,
    pub(crate) policy:    Box<dyn SchedulingPolicy>,
    pub(crate) committed: u64,
}

impl Scheduler {
    pub fn new(policy: impl SchedulingPolicy) -> Self {
        Self { backlog: Vec::new(), policy: Box::new(policy), committed: 0 }
    }

    /// Queue `task` for the next step.  No other side effect.
    pub fn submit_task(&mut self, task: Task) {
        self.backlog.push(task);
    }

    pub fn backlog(&self) -> &[Task] {
        &self.backlog
    }

    pub fn backlog_units(&self) -> u64 {
        self.backlog.iter().map(Task::remaining_units).sum()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Tasks this scheduler has committed to its children over the run.
    pub fn tasks_committed(&self) -> u64 {
        self.committed
    }
}
