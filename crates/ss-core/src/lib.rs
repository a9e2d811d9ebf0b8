//! `ss-core` — foundational types for the `schedule_sim` framework.
//!
//! This crate is a dependency of every other `ss-*` crate.  It intentionally
//! has no `ss-*` dependencies and minimal external ones (`rand`, `thiserror`
//! and `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module            | Contents                                            |
//! |-------------------|-----------------------------------------------------|
//! | [`ids`]           | `EntityId`, `TaskId`                                |
//! | [`time`]          | `Step`, `SimClock`, `SimConfig`                     |
//! | [`task`]          | `Task`, `TaskIdSource`                              |
//! | [`rng`]           | `SimRng` (run-level, seeded)                        |
//! | [`diagnostics`]   | `Diagnostics`, `Diagnostic`, `Warning`              |
//! | [`error`]         | `SsError`, `SsResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and config types.    |

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod rng;
pub mod task;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diagnostics::{Diagnostic, Diagnostics, Warning};
pub use error::{SsError, SsResult};
pub use ids::{EntityId, TaskId};
pub use rng::SimRng;
pub use task::{Task, TaskIdSource};
pub use time::{SimClock, SimConfig, Step};
