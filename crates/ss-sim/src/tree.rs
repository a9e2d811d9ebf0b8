//! Arena of entities and the pre-order step walk.
//!
//! Nodes are addressed by [`EntityId`], which is simply the slot index in
//! `entities`.  Slots are never removed, so ids stay valid for the life of
//! the tree.

use ss_core::{Diagnostics, EntityId, SimRng, Step, Task, TaskIdSource, Warning};
use ss_policy::{ChildView, FastTrackConfig, FastTrackPolicy, PolicyContext, SchedulingPolicy};
use ss_workload::{WaveGenerator, WaveSchedule};

use crate::{
    Consumer, Entity, EntityKind, NodeKind, Producer, Scheduler, SimError, SimObserver,
    SimResult, StepSummary,
};

/// Owns every producer, scheduler and consumer of a simulation.
#[derive(Default)]
pub struct EntityTree {
    entities: Vec<Entity>,

    /// Tasks handed in through [`EntityTree::submit_task`] rather than by a
    /// producer.  Counted as submitted for the completion check.
    injected: u64,
}

/// Mutable state threaded through one step walk.
struct StepCtx<'a, O: SimObserver> {
    now:         Step,
    ids:         &'a mut TaskIdSource,
    rng:         &'a mut SimRng,
    diagnostics: &'a mut Diagnostics,
    observer:    &'a mut O,
    summary:     StepSummary,
}

impl EntityTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    fn push(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    pub fn add_producer(&mut self, name: impl Into<String>) -> EntityId {
        self.push(Entity::new(name, EntityKind::Producer(Producer::new())))
    }

    pub fn add_scheduler(
        &mut self,
        name:   impl Into<String>,
        policy: impl SchedulingPolicy,
    ) -> EntityId {
        self.push(Entity::new(name, EntityKind::Scheduler(Scheduler::new(policy))))
    }

    /// Add a scheduler running [`FastTrackPolicy`] with `config`.
    ///
    /// # Errors
    ///
    /// `SimError::Policy` if the margin is outside (0, 1).
    pub fn add_fast_track_scheduler(
        &mut self,
        name:   impl Into<String>,
        config: FastTrackConfig,
    ) -> SimResult<EntityId> {
        let policy = FastTrackPolicy::new(config)?;
        Ok(self.add_scheduler(name, policy))
    }

    /// Add a leaf that executes `units_per_step` units of work per step.
    ///
    /// # Errors
    ///
    /// `SimError::Config` if `units_per_step` is zero.
    pub fn add_consumer(
        &mut self,
        name:           impl Into<String>,
        units_per_step: u64,
    ) -> SimResult<EntityId> {
        let name = name.into();
        if units_per_step == 0 {
            return Err(SimError::Config(format!(
                "consumer {name:?} must process at least one unit per step"
            )));
        }
        Ok(self.push(Entity::new(name, EntityKind::Consumer(Consumer::new(units_per_step)))))
    }

    /// Register a wave on `producer` at `step`, overwriting any existing one.
    pub fn add_metatask(
        &mut self,
        producer:  EntityId,
        step:      Step,
        generator: impl WaveGenerator + 'static,
    ) -> SimResult<()> {
        match &mut self.slot_mut(producer)?.kind {
            EntityKind::Producer(p) => {
                p.add_metatask(step, generator);
                Ok(())
            }
            _ => Err(SimError::NotAProducer(producer)),
        }
    }

    /// Replace `producer`'s whole wave schedule.
    pub fn set_wave_schedule(&mut self, producer: EntityId, schedule: WaveSchedule) -> SimResult<()> {
        match &mut self.slot_mut(producer)?.kind {
            EntityKind::Producer(p) => {
                p.set_schedule(schedule);
                Ok(())
            }
            _ => Err(SimError::NotAProducer(producer)),
        }
    }

    /// Make `child` a child of `parent`.
    ///
    /// Schedulers append.  Producers hold a single child, so any existing
    /// children are detached and become roots first.  A child that already
    /// has a different parent is moved; re-adding to the same parent is a
    /// no-op.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> SimResult<()> {
        let parent_kind = self.slot(parent)?.node_kind();
        let child_kind = self.slot(child)?.node_kind();

        if parent_kind == NodeKind::Consumer {
            return Err(SimError::LeafParent(parent));
        }
        if !child_kind.accepts_tasks() {
            return Err(SimError::NotTaskAccepting(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SimError::Cycle { parent, child });
        }
        if self.entities[child.index()].parent == Some(parent) {
            return Ok(());
        }

        if let Some(old) = self.entities[child.index()].parent {
            self.entities[old.index()].children.retain(|&c| c != child);
        }
        if parent_kind == NodeKind::Producer {
            for orphan in std::mem::take(&mut self.entities[parent.index()].children) {
                tracing::debug!(producer = %parent, %orphan, "detaching producer child");
                self.entities[orphan.index()].parent = None;
            }
        }
        self.entities[parent.index()].children.push(child);
        self.entities[child.index()].parent = Some(parent);
        Ok(())
    }

    /// `true` if `ancestor` is `node` or lies on `node`'s parent chain.
    fn is_ancestor_or_self(&self, ancestor: EntityId, node: EntityId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.entities[id.index()].parent;
        }
        false
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    fn slot(&self, id: EntityId) -> SimResult<&Entity> {
        self.entities.get(id.index()).ok_or(SimError::EntityNotFound(id))
    }

    fn slot_mut(&mut self, id: EntityId) -> SimResult<&mut Entity> {
        self.entities.get_mut(id.index()).ok_or(SimError::EntityNotFound(id))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(Entity::parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(Entity::children).unwrap_or(&[])
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i as u32), e))
    }

    // ── Task-accepting capability ─────────────────────────────────────────

    /// Processing rate of `id`.
    ///
    /// A consumer reports its configured rate, a scheduler the sum over its
    /// children, and a producer zero.
    pub fn units_per_step(&self, id: EntityId) -> u64 {
        let Some(entity) = self.get(id) else { return 0 };
        match &entity.kind {
            EntityKind::Consumer(c)  => c.units_per_step,
            EntityKind::Scheduler(_) => entity.children.iter().map(|&c| self.units_per_step(c)).sum(),
            EntityKind::Producer(_)  => 0,
        }
    }

    /// Remaining units held in `id`'s subtree: scheduler backlogs plus
    /// consumer queues.
    pub fn outstanding_units(&self, id: EntityId) -> u64 {
        let Some(entity) = self.get(id) else { return 0 };
        let own = match &entity.kind {
            EntityKind::Consumer(c)  => c.queued_units(),
            EntityKind::Scheduler(s) => s.backlog_units(),
            EntityKind::Producer(_)  => 0,
        };
        own + entity
            .children
            .iter()
            .map(|&c| self.outstanding_units(c))
            .sum::<u64>()
    }

    /// Steps until all work committed to `id` finishes.  Zero for a node
    /// with no capacity.
    pub fn delay(&self, id: EntityId) -> f64 {
        let capacity = self.units_per_step(id);
        if capacity == 0 {
            return 0.0;
        }
        self.outstanding_units(id) as f64 / capacity as f64
    }

    /// Queue `task` on a scheduler or consumer.
    ///
    /// The task is counted as submitted, so the end-of-run completion check
    /// expects it to finish.
    pub fn submit_task(&mut self, id: EntityId, task: Task) -> SimResult<()> {
        self.slot(id)?;
        match self.deliver(id, task) {
            Ok(()) => {
                self.injected += 1;
                Ok(())
            }
            Err(_) => Err(SimError::NotTaskAccepting(id)),
        }
    }

    /// Hand `task` to `id`'s queue, or give it back if `id` is a producer.
    fn deliver(&mut self, id: EntityId, task: Task) -> Result<(), Task> {
        match self.entities.get_mut(id.index()).map(|e| &mut e.kind) {
            Some(EntityKind::Scheduler(s)) => s.submit_task(task),
            Some(EntityKind::Consumer(c))  => c.submit_task(task),
            _ => return Err(task),
        }
        Ok(())
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// `true` once `id`'s subtree will never again produce or need to
    /// consume work.
    pub fn is_finished(&self, id: EntityId, now: Step) -> bool {
        let Some(entity) = self.get(id) else { return true };
        let own = match &entity.kind {
            EntityKind::Producer(p)  => p.is_finished(now),
            EntityKind::Scheduler(s) => s.backlog.is_empty(),
            EntityKind::Consumer(c)  => c.is_idle(),
        };
        own && entity.children.iter().all(|&c| self.is_finished(c, now))
    }

    /// `true` once every root subtree is finished.
    pub fn all_finished(&self, now: Step) -> bool {
        self.roots().into_iter().all(|r| self.is_finished(r, now))
    }

    /// Tasks producers have submitted plus tasks injected directly.
    pub fn tasks_submitted(&self) -> u64 {
        self.injected
            + self
                .entities
                .iter()
                .filter_map(Entity::as_producer)
                .map(Producer::tasks_submitted)
                .sum::<u64>()
    }

    pub fn tasks_completed(&self) -> u64 {
        self.entities
            .iter()
            .filter_map(Entity::as_consumer)
            .map(Consumer::tasks_completed)
            .sum()
    }

    /// Remaining units held anywhere in the tree.
    pub fn total_outstanding(&self) -> u64 {
        self.roots().into_iter().map(|r| self.outstanding_units(r)).sum()
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance every root subtree by one step, in insertion order.
    pub(crate) fn step<O: SimObserver>(
        &mut self,
        now:         Step,
        ids:         &mut TaskIdSource,
        rng:         &mut SimRng,
        diagnostics: &mut Diagnostics,
        observer:    &mut O,
    ) -> StepSummary {
        let mut cx = StepCtx {
            now,
            ids,
            rng,
            diagnostics,
            observer,
            summary: StepSummary { step: now, ..StepSummary::default() },
        };
        for root in self.roots() {
            self.step_node(root, &mut cx);
        }
        let mut summary = cx.summary;
        summary.outstanding_units = self.total_outstanding();
        summary
    }

    /// Pre-order: `id` does its own work, then its children step in order.
    fn step_node<O: SimObserver>(&mut self, id: EntityId, cx: &mut StepCtx<'_, O>) {
        match self.entities[id.index()].node_kind() {
            NodeKind::Producer  => self.step_producer(id, cx),
            NodeKind::Scheduler => self.step_scheduler(id, cx),
            NodeKind::Consumer  => self.step_consumer(id, cx),
        }
        let mut i = 0;
        while let Some(&child) = self.entities[id.index()].children.get(i) {
            self.step_node(child, cx);
            i += 1;
        }
    }

    fn step_producer<O: SimObserver>(&mut self, id: EntityId, cx: &mut StepCtx<'_, O>) {
        let entity = &self.entities[id.index()];
        let EntityKind::Producer(producer) = &entity.kind else { return };
        let Some(wave) = producer.schedule.get(cx.now) else { return };
        let tasks = wave.generate(cx.ids, cx.rng);

        let Some(&child) = entity.children.first() else {
            cx.diagnostics.warn(cx.now, id, Warning::ProducerWithoutChild { dropped: tasks.len() });
            return;
        };

        let mut submitted = 0u64;
        for task in tasks {
            match self.deliver(child, task) {
                Ok(()) => submitted += 1,
                Err(_) => cx.diagnostics.warn(cx.now, id, Warning::NotTaskAccepting { target: child }),
            }
        }
        tracing::trace!(step = %cx.now, producer = %id, %child, submitted, "wave submitted");

        if let EntityKind::Producer(producer) = &mut self.entities[id.index()].kind {
            producer.submitted += submitted;
        }
        cx.summary.tasks_submitted += submitted;
    }

    fn step_scheduler<O: SimObserver>(&mut self, id: EntityId, cx: &mut StepCtx<'_, O>) {
        let entity = &self.entities[id.index()];
        let EntityKind::Scheduler(scheduler) = &entity.kind else { return };
        if scheduler.backlog.is_empty() {
            return;
        }
        if entity.children.is_empty() {
            let backlog = scheduler.backlog.len();
            cx.diagnostics.warn(cx.now, id, Warning::NoChildren { backlog });
            return;
        }

        // Snapshot before any child steps.
        let views: Vec<ChildView> = entity
            .children
            .iter()
            .map(|&c| ChildView { id: c, units_per_step: self.units_per_step(c), delay: self.delay(c) })
            .collect();

        let EntityKind::Scheduler(scheduler) = &mut self.entities[id.index()].kind else { return };
        let tasks = std::mem::take(&mut scheduler.backlog);
        let ctx = PolicyContext::new(cx.now, id, &views);
        let outcome = scheduler.policy.assign(&ctx, tasks, cx.diagnostics);

        let mut leftovers = outcome.unassigned;
        let mut committed = 0u64;
        for assignment in outcome.assignments {
            let child = assignment.child;
            if !views.iter().any(|v| v.id == child) {
                cx.diagnostics.warn(cx.now, id, Warning::ForeignChild { child });
                leftovers.push(assignment.task);
                continue;
            }
            if self.entities[child.index()].node_kind() == NodeKind::Consumer {
                cx.observer.on_task_committed(cx.now, id, child, &assignment.task);
            }
            match self.deliver(child, assignment.task) {
                Ok(()) => committed += 1,
                Err(task) => leftovers.push(task),
            }
        }

        if !leftovers.is_empty() {
            cx.diagnostics.warn(
                cx.now,
                id,
                Warning::BacklogNotDrained { remaining: leftovers.len() },
            );
        }
        if let EntityKind::Scheduler(scheduler) = &mut self.entities[id.index()].kind {
            scheduler.committed += committed;
            scheduler.backlog.extend(leftovers);
        }
        cx.summary.tasks_committed += committed;
    }

    fn step_consumer<O: SimObserver>(&mut self, id: EntityId, cx: &mut StepCtx<'_, O>) {
        let EntityKind::Consumer(consumer) = &mut self.entities[id.index()].kind else { return };
        let finished = consumer.execute();
        cx.summary.tasks_completed += finished.len() as u64;
        for task in finished {
            cx.observer.on_task_completed(cx.now, id, task);
        }
    }
}
