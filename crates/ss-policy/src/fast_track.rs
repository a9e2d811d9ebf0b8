//! Adaptive fast-track policy: Min-Min on a fast track, Max-Min on the rest.
//!
//! # Algorithm (one scheduler step)
//!
//! ```text
//! ① snapshot   committed_delay[c] = c.delay                for every child c
//! ② tasks      sort desc by remaining work;
//!              first round(n·(1−margin)) → normal, rest → fast
//! ③ target     fast_target = Σcapacity / (fast_units + normal_units) · fast_units
//! ④ children   sort asc by capacity; move children to fast while
//!              fast_target − fast_capacity > next.capacity;
//!              empty fast track → take the largest child
//! ⑤ fast       tasks asc   (Min-Min) → argmin remaining/ups + committed_delay
//! ⑥ normal     tasks desc  (Max-Min) → argmin remaining/ups + committed_delay
//! ```
//!
//! The smallest tasks by *count* get a slice of capacity proportional to
//! their share of *work*, so short jobs finish quickly while the bulk of work
//! keeps the bulk of capacity.

use std::fmt;

use ss_core::{Diagnostics, Task, Warning};

use crate::compare::{child_min_capacity_first, task_max_first, task_min_first};
use crate::{
    Assignment, ChildView, CommittedDelays, PolicyContext, PolicyError, PolicyOutcome,
    PolicyResult, SchedulingPolicy,
};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Tuning for [`FastTrackPolicy`].
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FastTrackConfig {
    /// Target fraction of tasks (by count) routed to the fast track.
    /// Must lie in (0, 1).  Default: 0.4.
    pub margin: f64,
}

impl FastTrackConfig {
    pub const DEFAULT_MARGIN: f64 = 0.4;

    pub fn validate(&self) -> PolicyResult<()> {
        if self.margin > 0.0 && self.margin < 1.0 {
            Ok(())
        } else {
            Err(PolicyError::InvalidMargin(self.margin))
        }
    }
}

impl Default for FastTrackConfig {
    fn default() -> Self {
        Self { margin: Self::DEFAULT_MARGIN }
    }
}

// ── Partitions ────────────────────────────────────────────────────────────────

/// One side of the partition.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Track {
    Fast,
    Normal,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Fast   => f.write_str("fast"),
            Track::Normal => f.write_str("normal"),
        }
    }
}

/// Tasks split by count into the two tracks.
#[derive(Debug, Default)]
pub struct TaskTracks {
    /// The largest tasks, in descending order of remaining work.
    pub normal:       Vec<Task>,
    /// The remaining (smaller) tasks, in descending order of remaining work.
    pub fast:         Vec<Task>,
    pub normal_units: u64,
    pub fast_units:   u64,
}

impl TaskTracks {
    pub fn len(&self) -> usize {
        self.normal.len() + self.fast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.fast.is_empty()
    }
}

/// Children split by capacity into the two tracks.  Both sides keep the
/// ascending-capacity order they were walked in.
#[derive(Clone, Debug, Default)]
pub struct ChildTracks {
    pub fast:   Vec<ChildView>,
    pub normal: Vec<ChildView>,
}

impl ChildTracks {
    pub fn fast_capacity(&self) -> u64 {
        self.fast.iter().map(|c| c.units_per_step).sum()
    }

    pub fn len(&self) -> usize {
        self.fast.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fast.is_empty() && self.normal.is_empty()
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// Resolution the normal-track count product is snapped to before rounding.
const COUNT_SNAP: f64 = 1e9;

/// Hybrid Min-Min / Max-Min scheduler with adaptive track sizing.
#[derive(Clone, Debug, Default)]
pub struct FastTrackPolicy {
    config: FastTrackConfig,
}

impl FastTrackPolicy {
    pub fn new(config: FastTrackConfig) -> PolicyResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Shorthand for `new(FastTrackConfig { margin })`.
    pub fn with_margin(margin: f64) -> PolicyResult<Self> {
        Self::new(FastTrackConfig { margin })
    }

    pub fn margin(&self) -> f64 {
        self.config.margin
    }

    /// How many of `task_count` tasks go to the normal track
    /// (`round(n · (1 − margin))`, half rounds up).
    ///
    /// The product is snapped to [`COUNT_SNAP`] before rounding so that a
    /// decimal margin landing on an exact half (`45 · 0.7 = 31.5`) is not
    /// rounded down by binary representation error.
    pub fn normal_count(&self, task_count: usize) -> usize {
        let product = task_count as f64 * (1.0 - self.config.margin);
        let snapped = (product * COUNT_SNAP).round() / COUNT_SNAP;
        (snapped.round() as usize).min(task_count)
    }

    /// Step ②: split `tasks` by count, largest first into the normal track.
    pub fn partition_tasks(&self, mut tasks: Vec<Task>) -> TaskTracks {
        tasks.sort_by(task_max_first);
        let normal_count = self.normal_count(tasks.len());

        let mut tracks = TaskTracks::default();
        for task in tasks {
            if tracks.normal.len() < normal_count {
                tracks.normal_units += task.remaining_units();
                tracks.normal.push(task);
            } else {
                tracks.fast_units += task.remaining_units();
                tracks.fast.push(task);
            }
        }
        tracks
    }
}

/// Step ③: the capacity the fast track should receive, proportional to its
/// share of pending work.  Zero when there is no pending work at all.
pub fn fast_track_target(total_capacity: u64, fast_units: u64, normal_units: u64) -> f64 {
    let total_units = fast_units + normal_units;
    if total_units == 0 {
        return 0.0;
    }
    let capacity_per_unit = total_capacity as f64 / total_units as f64;
    capacity_per_unit * fast_units as f64
}

/// Step ④: walk children smallest-capacity first, moving each into the fast
/// track while the unmet target strictly exceeds its capacity.
///
/// The walk stops at the first child that does not qualify.  If nothing
/// qualified, the largest child is forced into the fast track so it is never
/// empty (given at least one child).
pub fn partition_children(children: &[ChildView], target: f64) -> ChildTracks {
    let mut ordered = children.to_vec();
    ordered.sort_by(child_min_capacity_first);

    let mut fast_capacity = 0u64;
    let mut taken = 0usize;
    while let Some(next) = ordered.get(taken) {
        if target - fast_capacity as f64 > next.units_per_step as f64 {
            fast_capacity += next.units_per_step;
            taken += 1;
        } else {
            break;
        }
    }

    let mut normal = ordered.split_off(taken);
    let mut fast = ordered;
    if fast.is_empty() {
        if let Some(largest) = normal.pop() {
            fast.push(largest);
        }
    }
    ChildTracks { fast, normal }
}

/// Steps ⑤/⑥: greedily bind each task, in the given order, to the child with
/// the earliest projected completion.  The first child wins ties.
///
/// Returns the tasks it could not bind, which is all of them when `children`
/// is empty and none otherwise.
pub fn assign_track(
    tasks:    Vec<Task>,
    children: &[ChildView],
    delays:   &mut CommittedDelays,
    out:      &mut Vec<Assignment>,
) -> Vec<Task> {
    if children.is_empty() {
        return tasks;
    }
    for task in tasks {
        let mut best = &children[0];
        let mut best_completion = delays.projected_completion(&task, best);
        for child in &children[1..] {
            let projected = delays.projected_completion(&task, child);
            if projected < best_completion {
                best = child;
                best_completion = projected;
            }
        }

        delays.commit(best.id, best_completion);
        out.push(Assignment {
            task,
            child: best.id,
            projected_completion: best_completion,
        });
    }
    Vec::new()
}

impl SchedulingPolicy for FastTrackPolicy {
    fn name(&self) -> &'static str {
        "minmin-maxmin-fast-track"
    }

    fn assign(
        &self,
        ctx:         &PolicyContext<'_>,
        tasks:       Vec<Task>,
        diagnostics: &mut Diagnostics,
    ) -> PolicyOutcome {
        if tasks.is_empty() || ctx.children.is_empty() {
            return PolicyOutcome::unassigned(tasks);
        }

        // ① Snapshot delays.
        let mut delays = CommittedDelays::snapshot(ctx.children);

        // ② Tasks by count.
        let task_count = tasks.len();
        let tracks = self.partition_tasks(tasks);
        if tracks.len() != task_count {
            diagnostics.warn(
                ctx.step,
                ctx.scheduler,
                Warning::UnassignedTasks { count: task_count.abs_diff(tracks.len()) },
            );
        }

        // ③ Capacity target.
        let target = fast_track_target(ctx.total_capacity(), tracks.fast_units, tracks.normal_units);

        // ④ Children by capacity.
        let children = partition_children(ctx.children, target);
        if children.len() != ctx.children.len() {
            diagnostics.warn(
                ctx.step,
                ctx.scheduler,
                Warning::UnassignedChildren { count: ctx.children.len().abs_diff(children.len()) },
            );
        }

        tracing::debug!(
            step = %ctx.step,
            scheduler = %ctx.scheduler,
            fast_tasks = tracks.fast.len(),
            normal_tasks = tracks.normal.len(),
            fast_units = tracks.fast_units,
            normal_units = tracks.normal_units,
            fast_target = target,
            fast_children = children.fast.len(),
            fast_capacity = children.fast_capacity(),
            "fast-track partition"
        );

        let TaskTracks { mut fast, mut normal, .. } = tracks;
        let mut assignments = Vec::with_capacity(task_count);

        // ⑤ Min-Min on the fast track.
        fast.sort_by(task_min_first);
        let fast_children = track_children(Track::Fast, &children, fast.len(), ctx);
        let mut unassigned = assign_track(fast, fast_children, &mut delays, &mut assignments);

        // ⑥ Max-Min on the normal track.
        normal.sort_by(task_max_first);
        let normal_children = track_children(Track::Normal, &children, normal.len(), ctx);
        unassigned.extend(assign_track(normal, normal_children, &mut delays, &mut assignments));

        PolicyOutcome { assignments, unassigned }
    }
}

/// Children serving `track`.
///
/// A track with tasks but no children borrows the other track's children.
/// This is the ordinary single-child case (the lone child is forced into the
/// fast track), so it is logged at debug level only.
fn track_children<'c>(
    track:      Track,
    children:   &'c ChildTracks,
    task_count: usize,
    ctx:        &PolicyContext<'_>,
) -> &'c [ChildView] {
    let (own, other) = match track {
        Track::Fast   => (&children.fast, &children.normal),
        Track::Normal => (&children.normal, &children.fast),
    };
    if own.is_empty() && task_count > 0 {
        tracing::debug!(
            step = %ctx.step,
            scheduler = %ctx.scheduler,
            "{track} track has {task_count} tasks but no children; using the other track"
        );
        return other;
    }
    own
}
