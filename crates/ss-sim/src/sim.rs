//! The `Sim` struct and its step loop.

use ss_core::{Diagnostics, SimClock, SimConfig, SimRng, Step, TaskIdSource};

use crate::{EntityTree, SimError, SimObserver, SimResult, StepSummary};

/// What a completed [`Sim::run`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RunSummary {
    /// Steps executed by this call.
    pub steps:           u64,
    pub tasks_submitted: u64,
    pub tasks_completed: u64,
    /// Diagnostics recorded over the whole simulation so far.
    pub warnings:        usize,
}

/// The main simulation runner.
///
/// Each step walks every root subtree of the [`EntityTree`] in insertion
/// order (see the crate docs for the per-node work).  Stepping itself never
/// fails; anomalies land in `diagnostics`.  Only the end-of-run completion
/// check in [`Sim::run`] produces an error.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total steps, seed, output interval).
    pub config: SimConfig,

    /// Current step.
    pub clock: SimClock,

    /// Every producer, scheduler and consumer.
    pub tree: EntityTree,

    /// Shared by all wave generators.  Seeded from `config.seed`.
    pub rng: SimRng,

    /// Hands out task ids for generated waves.
    pub ids: TaskIdSource,

    /// Non-fatal anomalies recorded while stepping.
    pub diagnostics: Diagnostics,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Step until every entity is finished or `config.end_step()` is
    /// reached, then check that every submitted task completed.
    ///
    /// Finished-ness is checked after a step's work and before the clock
    /// advances, so a wave due at the current step is never skipped.
    ///
    /// # Errors
    ///
    /// `SimError::BadTaskCompletion` when the submitted and completed
    /// counts differ at the end, which is the case whenever the step limit
    /// cuts a run short.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let mut steps = 0u64;
        loop {
            let now = self.clock.current_step;
            if now >= self.config.end_step() {
                tracing::info!(%now, "step limit reached");
                break;
            }

            self.step_once(now, observer);
            steps += 1;

            let finished = self.tree.all_finished(now);
            self.clock.advance();
            if finished {
                tracing::info!(%now, "all entities finished");
                break;
            }
        }
        observer.on_sim_end(self.clock.current_step);

        let summary = RunSummary {
            steps,
            tasks_submitted: self.tree.tasks_submitted(),
            tasks_completed: self.tree.tasks_completed(),
            warnings:        self.diagnostics.len(),
        };
        tracing::info!(
            steps,
            submitted = summary.tasks_submitted,
            completed = summary.tasks_completed,
            warnings = summary.warnings,
            "simulation finished"
        );
        self.check_completion()?;
        Ok(summary)
    }

    /// Run exactly `n` steps from the current position, ignoring both the
    /// step limit and finished-ness.  No completion check.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_step;
            self.step_once(now, observer);
            self.clock.advance();
        }
        Ok(())
    }

    /// `true` once every entity is finished as of the last executed step.
    pub fn is_finished(&self) -> bool {
        self.tree.all_finished(self.last_step())
    }

    /// Fail with both counts if any submitted task has not completed.
    pub fn check_completion(&self) -> SimResult<()> {
        let submitted = self.tree.tasks_submitted();
        let completed = self.tree.tasks_completed();
        if submitted != completed {
            return Err(SimError::BadTaskCompletion { submitted, completed });
        }
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn step_once<O: SimObserver>(&mut self, now: Step, observer: &mut O) -> StepSummary {
        observer.on_step_start(now);
        let summary = self.tree.step(
            now,
            &mut self.ids,
            &mut self.rng,
            &mut self.diagnostics,
            observer,
        );
        observer.on_step_end(&summary);
        if self.config.output_due(now) {
            observer.on_snapshot(now, &self.tree);
        }
        summary
    }

    fn last_step(&self) -> Step {
        Step(self.clock.current_step.0.saturating_sub(1))
    }
}
