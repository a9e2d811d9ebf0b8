//! Ordering functions passed explicitly into stable sorts.
//!
//! Every comparator is a total order on its key.  Ties are left `Equal` so
//! that `slice::sort_by` (stable) keeps the original relative order.

use std::cmp::Ordering;

use ss_core::Task;

use crate::ChildView;

/// Smallest remaining work first.
#[inline]
pub fn task_min_first(a: &Task, b: &Task) -> Ordering {
    a.remaining_units().cmp(&b.remaining_units())
}

/// Largest remaining work first.
#[inline]
pub fn task_max_first(a: &Task, b: &Task) -> Ordering {
    b.remaining_units().cmp(&a.remaining_units())
}

/// Lowest processing rate first.
#[inline]
pub fn child_min_capacity_first(a: &ChildView, b: &ChildView) -> Ordering {
    a.units_per_step.cmp(&b.units_per_step)
}
