//! `ss-workload` — wave generators, wave schedules, and CSV loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`wave`]      | `WaveGenerator` trait, `FixedWave`, `UniformWave`, `CombinedWave` |
//! | [`schedule`]  | `WaveSchedule` (`BTreeMap<Step, Box<dyn WaveGenerator>>`) |
//! | [`loader`]    | `load_waves_csv`, `load_waves_reader`                     |
//! | [`error`]     | `WorkloadError`, `WorkloadResult<T>`                      |
//!
//! # Wave model (summary)
//!
//! A producer owns one `WaveSchedule`.  At step `t` it asks the schedule for
//! the generator registered at exactly `t`; if there is one, the generator
//! produces a batch of fresh tasks:
//!
//! ```text
//! wave(t)       = schedule.get(t)?.generate(ids, rng)
//! producer done = !schedule.has_wave_after(t)
//! ```

pub mod error;
pub mod loader;
pub mod schedule;
pub mod wave;


pub use error::{WorkloadError, WorkloadResult};
pub use loader::{load_waves_csv, load_waves_reader};
pub use schedule::WaveSchedule;
pub use wave::{CombinedWave, FixedWave, UniformWave, WaveGenerator, WaveGeneratorExt};
