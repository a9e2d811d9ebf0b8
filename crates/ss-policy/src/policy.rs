//! The `SchedulingPolicy` trait — the extension point for new heuristics.

use ss_core::{Diagnostics, Task};

use crate::{PolicyContext, PolicyOutcome};

/// Pluggable binding strategy for a scheduler.
///
/// Called once per scheduler step when the scheduler has at least one child
/// and a non-empty backlog.  The policy receives the *entire* backlog and
/// must bind every task to exactly one child from `ctx.children`.
///
/// Policies hold configuration only; all bookkeeping (partitions, committed
/// delays) is rebuilt from `ctx` every call.  Anomalies are reported through
/// `diagnostics` rather than returned as errors: a step never fails.
///
/// # Example
///
/// ```rust,ignore
/// struct FirstChild;
///
/// impl SchedulingPolicy for FirstChild {
///     fn name(&self) -> &'static str { "first-child" }
///
///     fn assign(&self, ctx: &PolicyContext<'_>, tasks: Vec<Task>, _: &mut Diagnostics) -> PolicyOutcome {
///         let child = ctx.children[0];
///         PolicyOutcome {
///             assignments: tasks.into_iter()
///                 .map(|task| Assignment { task, child: child.id, projected_completion: child.delay })
///                 .collect(),
///             unassigned: vec![],
///         }
///     }
/// }
/// ```
pub trait SchedulingPolicy: 'static {
    /// Short identifier used in logs and output.
    fn name(&self) -> &'static str;

    /// Bind every task in `tasks` to a child in `ctx.children`.
    fn assign(
        &self,
        ctx:         &PolicyContext<'_>,
        tasks:       Vec<Task>,
        diagnostics: &mut Diagnostics,
    ) -> PolicyOutcome;
}
