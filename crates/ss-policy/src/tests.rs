//! Unit tests for ss-policy.

use std::collections::HashMap;

use ss_core::{Diagnostics, EntityId, Step, Task, TaskId};

use crate::fast_track::{assign_track, fast_track_target, partition_children};
use crate::{
    Assignment, ChildView, CommittedDelays, FastTrackConfig, FastTrackPolicy, PolicyContext,
    SchedulingPolicy,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Tasks with ids 0.. and the given sizes, in order.
fn tasks(sizes: &[u64]) -> Vec<Task> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &u)| Task::new(TaskId(i as u64), u))
        .collect()
}

/// Idle children with ids 0.. and the given capacities.
fn children(caps: &[u64]) -> Vec<ChildView> {
    caps.iter()
        .enumerate()
        .map(|(i, &c)| ChildView { id: EntityId(i as u32), units_per_step: c, delay: 0.0 })
        .collect()
}

fn units(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.remaining_units()).collect()
}

fn ids(children: &[ChildView]) -> Vec<u32> {
    children.iter().map(|c| c.id.0).collect()
}

/// Map child → task sizes assigned to it, in assignment order.
fn by_child(assignments: &[Assignment]) -> HashMap<u32, Vec<u64>> {
    let mut map: HashMap<u32, Vec<u64>> = HashMap::new();
    for a in assignments {
        map.entry(a.child.0).or_default().push(a.task.remaining_units());
    }
    map
}

fn run_policy(
    margin:   f64,
    sizes:    &[u64],
    children: &[ChildView],
) -> (Vec<Assignment>, Diagnostics) {
    let policy = FastTrackPolicy::with_margin(margin).unwrap();
    let ctx = PolicyContext::new(Step(0), EntityId(99), children);
    let mut diagnostics = Diagnostics::new();
    let outcome = policy.assign(&ctx, tasks(sizes), &mut diagnostics);
    assert!(outcome.unassigned.is_empty(), "policy left tasks unassigned");
    (outcome.assignments, diagnostics)
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn default_margin() {
        assert_eq!(FastTrackConfig::default().margin, 0.4);
        assert_eq!(FastTrackPolicy::default().margin(), 0.4);
    }

    #[test]
    fn margin_must_be_open_unit_interval() {
        assert!(FastTrackPolicy::with_margin(0.0).is_err());
        assert!(FastTrackPolicy::with_margin(1.0).is_err());
        assert!(FastTrackPolicy::with_margin(-0.2).is_err());
        assert!(FastTrackPolicy::with_margin(f64::NAN).is_err());
        assert!(FastTrackPolicy::with_margin(0.01).is_ok());
        assert!(FastTrackPolicy::with_margin(0.99).is_ok());
    }
}

// ── Comparators ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod comparators {
    use super::*;
    use crate::compare::{child_min_capacity_first, task_max_first, task_min_first};

    #[test]
    fn task_orders_are_stable() {
        let mut ts = tasks(&[3, 1, 3, 2, 1]);
        ts.sort_by(task_min_first);
        let order: Vec<u64> = ts.iter().map(|t| t.id().0).collect();
        assert_eq!(order, vec![1, 4, 3, 0, 2]);

        let mut ts = tasks(&[3, 1, 3, 2, 1]);
        ts.sort_by(task_max_first);
        let order: Vec<u64> = ts.iter().map(|t| t.id().0).collect();
        assert_eq!(order, vec![0, 2, 3, 1, 4]);
    }

    #[test]
    fn child_order_is_stable() {
        let mut cs = children(&[10, 1, 5, 1]);
        cs.sort_by(child_min_capacity_first);
        assert_eq!(ids(&cs), vec![1, 3, 2, 0]);
    }
}

// ── Task partition ────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_partition {
    use super::*;

    #[test]
    fn normal_count_rounds_half_up() {
        let p = FastTrackPolicy::with_margin(0.4).unwrap();
        assert_eq!(p.normal_count(0), 0);
        assert_eq!(p.normal_count(1), 1);  // 0.6 → 1
        assert_eq!(p.normal_count(3), 2);  // 1.8 → 2
        assert_eq!(p.normal_count(10), 6);

        let half = FastTrackPolicy::with_margin(0.5).unwrap();
        assert_eq!(half.normal_count(5), 3); // 2.5 → 3
        assert_eq!(half.normal_count(4), 2);
    }

    #[test]
    fn largest_tasks_go_to_normal_track() {
        let p = FastTrackPolicy::with_margin(0.4).unwrap();
        let tracks = p.partition_tasks(tasks(&[4, 9, 1, 7, 2, 10, 3, 8, 6, 5]));
        assert_eq!(units(&tracks.normal), vec![10, 9, 8, 7, 6, 5]);
        assert_eq!(units(&tracks.fast), vec![4, 3, 2, 1]);
        assert_eq!(tracks.normal_units, 45);
        assert_eq!(tracks.fast_units, 10);
        assert_eq!(tracks.len(), 10);
    }

    /// (margin, n, round-half-up of n · (1 − margin) in exact arithmetic).
    /// Several rows land on an exact half that f64 evaluates just below.
    const COUNT_TABLE: [(f64, usize, usize); 16] = [
        (0.3,  45, 32), // 31.5
        (0.55, 30, 14), // 13.5
        (0.9,  15, 2),  // 1.5
        (0.5,   5, 3),  // 2.5
        (0.5,   7, 4),  // 3.5
        (0.25,  6, 5),  // 4.5
        (0.25, 10, 8),  // 7.5
        (0.75, 10, 3),  // 2.5
        (0.35, 10, 7),  // 6.5
        (0.15, 30, 26), // 25.5
        (0.4,  10, 6),
        (0.1,   7, 6),
        (0.9,   3, 0),
        (0.99,  1, 0),
        (0.01,  1, 1),
        (0.3,   0, 0),
    ];

    #[test]
    fn exact_halves_round_up() {
        for (margin, n, expected) in COUNT_TABLE {
            let p = FastTrackPolicy::with_margin(margin).unwrap();
            assert_eq!(p.normal_count(n), expected, "margin {margin}, n {n}");
        }
    }

    #[test]
    fn count_split_holds_for_many_sizes() {
        for (margin, n, expected) in COUNT_TABLE {
            let p = FastTrackPolicy::with_margin(margin).unwrap();
            let sizes: Vec<u64> = (0..n as u64).map(|i| (i * 7919) % 23 + 1).collect();
            let tracks = p.partition_tasks(tasks(&sizes));
            assert_eq!(tracks.normal.len(), expected, "margin {margin}, n {n}");
            assert_eq!(tracks.fast.len(), n - expected, "margin {margin}, n {n}");
            let min_normal = tracks.normal.iter().map(|t| t.remaining_units()).min();
            let max_fast = tracks.fast.iter().map(|t| t.remaining_units()).max();
            if let (Some(lo), Some(hi)) = (min_normal, max_fast) {
                assert!(lo >= hi, "normal track must hold the largest tasks");
            }
        }
    }

    #[test]
    fn partition_of_45_at_point_three() {
        let p = FastTrackPolicy::with_margin(0.3).unwrap();
        let sizes: Vec<u64> = (1..=45).collect();
        let tracks = p.partition_tasks(tasks(&sizes));
        assert_eq!(tracks.normal.len(), 32);
        assert_eq!(units(&tracks.fast), (1..=13).rev().collect::<Vec<u64>>());
    }
}

// ── Child partition ───────────────────────────────────────────────────────────

#[cfg(test)]
mod child_partition {
    use super::*;

    #[test]
    fn target_is_proportional_to_work() {
        assert!((fast_track_target(13, 21, 34) - 13.0 * 21.0 / 55.0).abs() < 1e-12);
        assert_eq!(fast_track_target(13, 0, 0), 0.0);
        assert_eq!(fast_track_target(13, 0, 50), 0.0);
    }

    /// The walk moves children while the unmet target *strictly exceeds* the
    /// next child's capacity, and stops at the first that does not qualify.
    #[test]
    fn ascending_walk_with_strict_exceeds() {
        let cs = children(&[1, 1, 1, 10]);
        let t = partition_children(&cs, 13.0 * 21.0 / 55.0); // ≈ 4.96
        assert_eq!(ids(&t.fast), vec![0, 1, 2]);
        assert_eq!(ids(&t.normal), vec![3]);

        // Exactly equal is not "exceeds": 2.0 − 1 = 1.0 is not > 1.
        let t = partition_children(&cs, 2.0);
        assert_eq!(ids(&t.fast), vec![0]);
        assert_eq!(ids(&t.normal), vec![1, 2, 3]);
    }

    #[test]
    fn walk_uses_ascending_order_not_child_order() {
        let cs = children(&[8, 2, 4, 1]);
        let t = partition_children(&cs, 5.0);
        // Ascending: 1(id3), 2(id1), 4(id2), 8(id0).  5>1 ✓, 4>2 ✓, 2>4 ✗.
        assert_eq!(ids(&t.fast), vec![3, 1]);
        assert_eq!(ids(&t.normal), vec![2, 0]);
        assert_eq!(t.fast_capacity(), 3);
    }

    #[test]
    fn empty_fast_track_takes_largest_child() {
        let cs = children(&[5, 1, 3]);
        let t = partition_children(&cs, 0.5);
        assert_eq!(ids(&t.fast), vec![0]);
        assert_eq!(ids(&t.normal), vec![1, 2]);
    }

    #[test]
    fn single_child_is_always_fast() {
        let cs = children(&[7]);
        let t = partition_children(&cs, 100.0);
        assert_eq!(ids(&t.fast), vec![0]);
        assert!(t.normal.is_empty());
        let t = partition_children(&cs, 0.0);
        assert_eq!(ids(&t.fast), vec![0]);
    }

    #[test]
    fn every_child_lands_in_exactly_one_track() {
        let cs = children(&[3, 9, 1, 1, 4, 12, 2]);
        for tenth in 0..=310 {
            let t = partition_children(&cs, tenth as f64 / 10.0);
            let mut all: Vec<u32> = ids(&t.fast).into_iter().chain(ids(&t.normal)).collect();
            all.sort_unstable();
            assert_eq!(all, vec![0, 1, 2, 3, 4, 5, 6]);
            assert!(!t.fast.is_empty());
        }
    }
}

// ── Greedy assignment ─────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use super::*;

    #[test]
    fn picks_min_projected_completion_first_wins_ties() {
        let cs = children(&[1, 1]);
        let mut delays = CommittedDelays::snapshot(&cs);
        let mut out = Vec::new();
        let left = assign_track(tasks(&[1, 2, 3, 4]), &cs, &mut delays, &mut out);
        assert!(left.is_empty());
        let chosen: Vec<u32> = out.iter().map(|a| a.child.0).collect();
        // 1 → tie → c0 (1);  2 → c1 (2);  3 → c0 (4);  4 → c1 (6)
        assert_eq!(chosen, vec![0, 1, 0, 1]);
        assert_eq!(delays.get(EntityId(0)), 4.0);
        assert_eq!(delays.get(EntityId(1)), 6.0);
    }

    #[test]
    fn respects_existing_delay_from_earlier_waves() {
        let mut cs = children(&[1, 1]);
        cs[0].delay = 10.0;
        let mut delays = CommittedDelays::snapshot(&cs);
        let mut out = Vec::new();
        assign_track(tasks(&[3]), &cs, &mut delays, &mut out);
        assert_eq!(out[0].child, EntityId(1));
        assert_eq!(out[0].projected_completion, 3.0);
    }

    #[test]
    fn zero_capacity_child_is_never_preferred() {
        let cs = children(&[0, 2]);
        let mut delays = CommittedDelays::snapshot(&cs);
        let mut out = Vec::new();
        assign_track(tasks(&[4, 0]), &cs, &mut delays, &mut out);
        assert!(out.iter().all(|a| a.child == EntityId(1)));
    }

    #[test]
    fn no_children_returns_everything() {
        let mut delays = CommittedDelays::default();
        let mut out = Vec::new();
        let left = assign_track(tasks(&[1, 2]), &[], &mut delays, &mut out);
        assert_eq!(left.len(), 2);
        assert!(out.is_empty());
    }

    #[test]
    fn committed_delay_never_decreases() {
        let cs = children(&[1, 2, 3, 5]);
        let mut delays = CommittedDelays::snapshot(&cs);
        let mut out = Vec::new();
        let sizes: Vec<u64> = (0..60).map(|i| (i * 37) % 17 + 1).collect();
        assign_track(tasks(&sizes), &cs, &mut delays, &mut out);

        let mut last: HashMap<EntityId, f64> = HashMap::new();
        for a in &out {
            let prev = last.insert(a.child, a.projected_completion).unwrap_or(0.0);
            assert!(a.projected_completion >= prev);
        }
    }
}

// ── Whole policy ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use super::*;

    const SIZES: [u64; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

    /// Ten tasks of 1..10 units onto children {1,1,1,10} at the default margin:
    /// normal = 10..5 (45 units), fast = 4..1 (10 units),
    /// target = 13·10/55 ≈ 2.36 → fast children {c0, c1}.
    #[test]
    fn round_trip_default_margin() {
        let (out, diagnostics) = run_policy(0.4, &SIZES, &children(&[1, 1, 1, 10]));
        assert!(diagnostics.is_empty());
        assert_eq!(out.len(), 10);

        let map = by_child(&out);
        assert_eq!(map[&0], vec![1, 3]);
        assert_eq!(map[&1], vec![2, 4]);
        assert!(!map.contains_key(&2));
        assert_eq!(map[&3], vec![10, 9, 8, 7, 6, 5]);
    }

    /// With margin 0.6 the split is 4 normal (7..10, 34 units) / 6 fast
    /// (1..6, 21 units); target = 13·21/55 ≈ 4.96, so exactly the three
    /// unit-capacity children form the fast track.
    #[test]
    fn round_trip_three_unit_children_fast() {
        let (out, diagnostics) = run_policy(0.6, &SIZES, &children(&[1, 1, 1, 10]));
        assert!(diagnostics.is_empty());

        let map = by_child(&out);
        assert_eq!(map[&0], vec![1, 4]);
        assert_eq!(map[&1], vec![2, 5]);
        assert_eq!(map[&2], vec![3, 6]);
        assert_eq!(map[&3], vec![10, 9, 8, 7]);
    }

    #[test]
    fn fast_track_assigned_before_normal() {
        let (out, _) = run_policy(0.4, &SIZES, &children(&[1, 1, 1, 10]));
        let order: Vec<u64> = out.iter().map(|a| a.task.remaining_units()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 10, 9, 8, 7, 6, 5]);
    }

    #[test]
    fn every_task_assigned_exactly_once() {
        let cs = children(&[2, 7, 1, 3, 3]);
        let sizes: Vec<u64> = (0..57).map(|i| (i * 13) % 29).collect();
        let (out, diagnostics) = run_policy(0.3, &sizes, &cs);
        assert!(diagnostics.is_empty());

        let mut seen: Vec<u64> = out.iter().map(|a| a.task.id().0).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..57).collect::<Vec<u64>>());
        assert!(out.iter().all(|a| a.child.0 < 5));
    }

    #[test]
    fn single_child_receives_everything() {
        let (out, diagnostics) = run_policy(0.4, &SIZES, &children(&[3]));
        assert!(diagnostics.is_empty());
        assert!(out.iter().all(|a| a.child == EntityId(0)));
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn zero_unit_tasks_do_not_poison_target() {
        let (out, diagnostics) = run_policy(0.4, &[0, 0, 0], &children(&[1, 4]));
        assert!(diagnostics.is_empty());
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|a| a.projected_completion.is_finite()));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let cs = children(&[4, 1, 4, 2, 9]);
        let sizes: Vec<u64> = (0..40).map(|i| (i * 11) % 7 + 1).collect();
        let summarize = |out: Vec<Assignment>| -> Vec<(u64, u32)> {
            out.into_iter().map(|a| (a.task.id().0, a.child.0)).collect()
        };
        let (a, _) = run_policy(0.4, &sizes, &cs);
        let (b, _) = run_policy(0.4, &sizes, &cs);
        assert_eq!(summarize(a), summarize(b));
    }

    #[test]
    fn empty_inputs_assign_nothing() {
        let policy = FastTrackPolicy::default();
        let cs = children(&[1]);
        let mut diagnostics = Diagnostics::new();

        let ctx = PolicyContext::new(Step(0), EntityId(9), &cs);
        let outcome = policy.assign(&ctx, Vec::new(), &mut diagnostics);
        assert!(outcome.assignments.is_empty() && outcome.unassigned.is_empty());

        let ctx = PolicyContext::new(Step(0), EntityId(9), &[]);
        let outcome = policy.assign(&ctx, tasks(&[5, 6]), &mut diagnostics);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.unassigned.len(), 2);
    }
}
