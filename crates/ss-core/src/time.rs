//! Simulation step model.
//!
//! Time is a monotonically increasing integer `Step`.  There is no mapping to
//! wall-clock time: a step is the unit every consumer's processing rate and
//! every projected completion time is expressed in.

use std::fmt;

use crate::{SsError, SsResult};

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The global step counter.  Only the driver advances it; entities read it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    pub current_step: Step,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current_step)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Hard upper bound on the number of steps a run may take.  A run that
    /// hits it without every entity finishing fails the completion check.
    pub total_steps: u64,

    /// Master RNG seed.  The same seed always produces identical waves.
    pub seed: u64,

    /// Report a step summary every N steps.  1 = every step; 0 = never.
    pub output_interval_steps: u64,
}

impl SimConfig {
    /// The step at which the run is cut off (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Reject configurations no run can use.
    ///
    /// # Errors
    ///
    /// `SsError::Config` if `total_steps` is zero.
    pub fn validate(&self) -> SsResult<()> {
        if self.total_steps == 0 {
            return Err(SsError::Config("total_steps must be positive".into()));
        }
        Ok(())
    }

    /// Whether a step summary is due at `step`.
    #[inline]
    pub fn output_due(&self, step: Step) -> bool {
        self.output_interval_steps > 0 && step.0.is_multiple_of(self.output_interval_steps)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_steps:           10_000,
            seed:                  0,
            output_interval_steps: 1,
        }
    }
}
