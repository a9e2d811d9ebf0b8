//! `ss-policy` — scheduling-policy trait, comparators, and shipped policies.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`context`]    | `ChildView`, `PolicyContext<'a>`, `Assignment`, `PolicyOutcome` |
//! | [`policy`]     | `SchedulingPolicy` trait                                      |
//! | [`compare`]    | task/child comparators used with stable sorts                 |
//! | [`delays`]     | `CommittedDelays` — per-step projected completion bookkeeping |
//! | [`fast_track`] | `FastTrackPolicy` (Min-Min / Max-Min hybrid), `FastTrackConfig`, `Track` |
//! | [`error`]      | `PolicyError`, `PolicyResult<T>`                              |
//!
//! # Design notes
//!
//! A scheduler's step is split in two, the same way on every policy:
//!
//! 1. **Decide** (policy): given a read-only snapshot of the children
//!    (`&[ChildView]`) and ownership of the drained backlog, return one
//!    [`Assignment`] per task.  The policy never touches the tree.
//!
//! 2. **Commit** (ss-sim): submit each assigned task to its child in the
//!    order the policy produced them, firing observer hooks on the way.
//!
//! This split keeps policies free of any borrow of the entity arena, so new
//! heuristics plug in without touching the generic scheduler.

pub mod compare;
pub mod context;
pub mod delays;
pub mod error;
pub mod fast_track;
pub mod policy;

#[cfg(test)]
mod tests;

pub use context::{Assignment, ChildView, PolicyContext, PolicyOutcome};
pub use delays::CommittedDelays;
pub use error::{PolicyError, PolicyResult};
pub use fast_track::{ChildTracks, FastTrackConfig, FastTrackPolicy, TaskTracks, Track};
pub use policy::SchedulingPolicy;
