//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ss_core::{EntityId, Step, Task};
use ss_sim::{EntityTree, SimObserver, StepSummary};

use crate::row::{AssignmentRow, EntitySnapshotRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes commits, step summaries and entity
/// snapshots to any [`OutputWriter`] backend.
///
/// Commits are buffered and written once per step.  Errors from the writer
/// are stored internally because `SimObserver` methods have no return value.
/// After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<AssignmentRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_assignments(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_task_committed(&mut self, step: Step, scheduler: EntityId, consumer: EntityId, task: &Task) {
        self.pending.push(AssignmentRow {
            step:      step.0,
            scheduler: scheduler.0,
            consumer:  consumer.0,
            task_id:   task.id().0,
            units:     task.remaining_units(),
        });
    }

    fn on_step_end(&mut self, summary: &StepSummary) {
        self.flush_pending();
        let row = StepSummaryRow {
            step:              summary.step.0,
            tasks_submitted:   summary.tasks_submitted,
            tasks_committed:   summary.tasks_committed,
            tasks_completed:   summary.tasks_completed,
            outstanding_units: summary.outstanding_units,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, tree: &EntityTree) {
        let rows: Vec<EntitySnapshotRow> = tree
            .iter()
            .map(|(id, entity)| EntitySnapshotRow {
                step:              step.0,
                entity_id:         id.0,
                name:              entity.name().to_owned(),
                kind:              entity.node_kind().as_str(),
                parent_id:         entity.parent().unwrap_or(EntityId::INVALID).0,
                units_per_step:    tree.units_per_step(id),
                outstanding_units: tree.outstanding_units(id),
                delay:             tree.delay(id),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_step: Step) {
        self.flush_pending();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
