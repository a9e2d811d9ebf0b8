//! Simulation observer trait for progress reporting and data collection.

use ss_core::{EntityId, Step, Task, TaskId};

use crate::EntityTree;

/// Per-step counters handed to [`SimObserver::on_step_end`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct StepSummary {
    pub step: Step,
    /// Tasks producers submitted this step.
    pub tasks_submitted: u64,
    /// Tasks schedulers committed to a child this step (any depth).
    pub tasks_committed: u64,
    /// Tasks consumers finished this step.
    pub tasks_completed: u64,
    /// Remaining units held anywhere in the tree after the step.
    pub outstanding_units: u64,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The core never looks at what an
/// observer does.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, s: &StepSummary) {
///         if s.step.0 % self.interval == 0 {
///             println!("{}: {} units outstanding", s.step, s.outstanding_units);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called whenever a scheduler commits a task to a leaf consumer, just
    /// before the consumer receives it.  This is the visualization hook.
    fn on_task_committed(
        &mut self,
        _step:      Step,
        _scheduler: EntityId,
        _consumer:  EntityId,
        _task:      &Task,
    ) {}

    /// Called when a consumer finishes a task.
    fn on_task_completed(&mut self, _step: Step, _consumer: EntityId, _task: TaskId) {}

    /// Called at the end of each step.
    fn on_step_end(&mut self, _summary: &StepSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_steps`).
    ///
    /// Provides read-only access to the whole tree so output writers can
    /// record per-entity state without the sim knowing any output format.
    fn on_snapshot(&mut self, _step: Step, _tree: &EntityTree) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
