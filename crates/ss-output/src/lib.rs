//! `ss-output` — simulation output writers for the schedule_sim framework.
//!
//! | Backend | Files created                                                        |
//! |---------|----------------------------------------------------------------------|
//! | CSV     | `assignments.csv`, `step_summaries.csv`, `entity_snapshots.csv`      |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ss_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ss_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AssignmentRow, EntitySnapshotRow, StepSummaryRow};
pub use writer::OutputWriter;
