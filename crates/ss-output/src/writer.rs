//! The `OutputWriter` trait implemented by backend writers.

use crate::{AssignmentRow, EntitySnapshotRow, OutputResult, StepSummaryRow};

/// Sink for simulation output.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of task → consumer commits.
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write a batch of per-entity snapshots.
    fn write_snapshots(&mut self, rows: &[EntitySnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
