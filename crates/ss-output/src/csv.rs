//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `assignments.csv`
//! - `step_summaries.csv`
//! - `entity_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AssignmentRow, EntitySnapshotRow, OutputResult, StepSummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    assignments: Writer<File>,
    summaries:   Writer<File>,
    snapshots:   Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut assignments = Writer::from_path(dir.join("assignments.csv"))?;
        assignments.write_record(["step", "scheduler", "consumer", "task_id", "units"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record([
            "step",
            "tasks_submitted",
            "tasks_committed",
            "tasks_completed",
            "outstanding_units",
        ])?;

        let mut snapshots = Writer::from_path(dir.join("entity_snapshots.csv"))?;
        snapshots.write_record([
            "step",
            "entity_id",
            "name",
            "kind",
            "parent_id",
            "units_per_step",
            "outstanding_units",
            "delay",
        ])?;

        Ok(Self { assignments, summaries, snapshots, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
        for row in rows {
            self.assignments.write_record(&[
                row.step.to_string(),
                row.scheduler.to_string(),
                row.consumer.to_string(),
                row.task_id.to_string(),
                row.units.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.tasks_submitted.to_string(),
            row.tasks_committed.to_string(),
            row.tasks_completed.to_string(),
            row.outstanding_units.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[EntitySnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.step.to_string(),
                row.entity_id.to_string(),
                row.name.clone(),
                row.kind.to_owned(),
                row.parent_id.to_string(),
                row.units_per_step.to_string(),
                row.outstanding_units.to_string(),
                format!("{:.3}", row.delay),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.assignments.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
