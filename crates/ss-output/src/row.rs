//! Plain data row types written by output backends.

/// One task committed to a leaf consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRow {
    pub step:      u64,
    pub scheduler: u32,
    pub consumer:  u32,
    pub task_id:   u64,
    /// Remaining units at the moment of commit.
    pub units:     u64,
}

/// Counters for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub step:              u64,
    pub tasks_submitted:   u64,
    pub tasks_committed:   u64,
    pub tasks_completed:   u64,
    pub outstanding_units: u64,
}

/// State of one entity at a snapshot step.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshotRow {
    pub step:              u64,
    pub entity_id:         u32,
    pub name:              String,
    /// `producer`, `scheduler` or `consumer`.
    pub kind:              &'static str,
    /// `u32::MAX` for roots.
    pub parent_id:         u32,
    pub units_per_step:    u64,
    pub outstanding_units: u64,
    pub delay:             f64,
}
