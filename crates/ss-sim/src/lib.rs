//! `ss-sim` — entity tree and step driver for the schedule_sim framework.
//!
//! # One step
//!
//! ```text
//! for step in 0..config.total_steps:
//!   for root in tree.roots():            (insertion order)
//!     pre-order walk: a node does its own work, then steps its children
//!       Producer   — wave due at `step`? generate it, submit every task
//!                    to the single child
//!       Scheduler  — snapshot children, hand the whole backlog to the
//!                    policy, commit each assignment in order
//!       Consumer   — spend `units_per_step` on the queue head(s)
//!   all entities finished? → stop
//! end: tasks submitted == tasks completed, else BadTaskCompletion
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ss_core::{SimConfig, Step};
//! use ss_policy::FastTrackPolicy;
//! use ss_sim::{EntityTree, NoopObserver, SimBuilder};
//! use ss_workload::FixedWave;
//!
//! let mut tree = EntityTree::new();
//! let producer = tree.add_producer("producer");
//! let broker = tree.add_scheduler("broker", FastTrackPolicy::default());
//! let vm = tree.add_consumer("vm-0", 4)?;
//! tree.add_child(producer, broker)?;
//! tree.add_child(broker, vm)?;
//! tree.add_metatask(producer, Step(0), FixedWave::new(vec![3, 5, 8]))?;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), tree).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod consumer;
pub mod entity;
pub mod error;
pub mod observer;
pub mod producer;
pub mod scheduler;
pub mod sim;
pub mod tree;


pub use builder::SimBuilder;
pub use consumer::Consumer;
pub use entity::{Entity, EntityKind, NodeKind};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, StepSummary};
pub use producer::Producer;
pub use scheduler::Scheduler;
pub use sim::{RunSummary, Sim};
pub use tree::EntityTree;
