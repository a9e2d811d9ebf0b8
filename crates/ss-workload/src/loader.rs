//! CSV wave loader.
//!
//! # CSV format
//!
//! One row per wave.  Each row becomes a [`UniformWave`] (or a [`FixedWave`]
//! when `min_units == max_units`) registered at `step`.
//!
//! ```csv
//! step,count,min_units,max_units
//! 0,10,1,10
//! 5,40,20,80
//! 12,3,100,100
//! ```
//!
//! Rows sharing a step overwrite one another; the last row wins, matching
//! [`WaveSchedule::insert`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ss_core::Step;

use crate::{FixedWave, UniformWave, WaveGenerator, WaveSchedule, WorkloadError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaveRecord {
    step:      u64,
    count:     usize,
    min_units: u64,
    max_units: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a producer's `WaveSchedule` from a CSV file.
pub fn load_waves_csv(path: &Path) -> Result<WaveSchedule, WorkloadError> {
    let file = std::fs::File::open(path)
        .map_err(WorkloadError::Io)?;
    load_waves_reader(file)
}

/// Like [`load_waves_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for schedules embedded in
/// a binary.
pub fn load_waves_reader<R: Read>(reader: R) -> Result<WaveSchedule, WorkloadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut schedule = WaveSchedule::new();

    for (line, result) in csv_reader.deserialize::<WaveRecord>().enumerate() {
        let row = result.map_err(|e| WorkloadError::Parse(e.to_string()))?;
        let generator = to_generator(&row)
            .map_err(|e| WorkloadError::Parse(format!("row {}: {e}", line + 1)))?;
        schedule.insert(Step(row.step), generator);
    }

    Ok(schedule)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_generator(row: &WaveRecord) -> Result<Box<dyn WaveGenerator>, WorkloadError> {
    if row.min_units == row.max_units {
        return Ok(Box::new(FixedWave::uniform(row.count, row.min_units)));
    }
    Ok(Box::new(UniformWave::new(row.count, row.min_units, row.max_units)?))
}
