//! Structured channel for non-fatal anomalies.
//!
//! Stepping never fails.  Configuration anomalies and policy invariant
//! violations are instead logged through `tracing` and recorded here, so a
//! run still completes and a test can assert that a correct run produced no
//! warnings at all.

use std::fmt;

use crate::{EntityId, Step};

/// What went wrong.
#[derive(Clone, PartialEq, Debug)]
pub enum Warning {
    /// A scheduler holds a backlog but has no children to drain it into.
    NoChildren { backlog: usize },

    /// A producer's wave came due but it has no child to submit to.
    ProducerWithoutChild { dropped: usize },

    /// Tasks were left in a scheduler backlog at the end of its step.
    BacklogNotDrained { remaining: usize },

    /// Tasks that the partition did not place in either track.
    UnassignedTasks { count: usize },

    /// Children that the partition did not place in either track.
    UnassignedChildren { count: usize },

    /// A policy targeted an entity that is not a child of the scheduler.
    ForeignChild { child: EntityId },

    /// A task was submitted to an entity that cannot accept tasks.
    NotTaskAccepting { target: EntityId },
}

impl Warning {
    /// `true` for policy invariant violations, `false` for configuration
    /// anomalies.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Warning::BacklogNotDrained { .. }
                | Warning::UnassignedTasks { .. }
                | Warning::UnassignedChildren { .. }
                | Warning::ForeignChild { .. }
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoChildren { backlog } => {
                write!(f, "scheduler has {backlog} waiting tasks but no children")
            }
            Warning::ProducerWithoutChild { dropped } => {
                write!(f, "producer has no child; {dropped} generated tasks not submitted")
            }
            Warning::BacklogNotDrained { remaining } => {
                write!(f, "{remaining} tasks left in backlog at end of step")
            }
            Warning::UnassignedTasks { count } => {
                write!(f, "{count} tasks were not assigned a track")
            }
            Warning::UnassignedChildren { count } => {
                write!(f, "{count} children were not assigned a track")
            }
            Warning::ForeignChild { child } => {
                write!(f, "policy assigned a task to {child}, which is not a child")
            }
            Warning::NotTaskAccepting { target } => {
                write!(f, "{target} cannot accept tasks")
            }
        }
    }
}

/// A warning tagged with where and when it happened.
#[derive(Clone, PartialEq, Debug)]
pub struct Diagnostic {
    pub step:    Step,
    pub entity:  EntityId,
    pub warning: Warning,
}

/// Collected warnings for a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `warning` and keep it.
    pub fn warn(&mut self, step: Step, entity: EntityId, warning: Warning) {
        if warning.is_invariant_violation() {
            tracing::error!(%step, %entity, "invariant violation: {warning}");
        } else {
            tracing::warn!(%step, %entity, "{warning}");
        }
        self.entries.push(Diagnostic { step, entity, warning });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded policy invariant violations.
    pub fn invariant_violations(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.warning.is_invariant_violation())
            .count()
    }

    /// Remove and return everything collected so far.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
