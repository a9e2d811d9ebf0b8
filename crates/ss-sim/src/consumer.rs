//! Leaf node that executes tasks at a fixed rate.

use std::collections::VecDeque;

use ss_core::{Task, TaskId};

/// Executes its queue in FIFO order, spending `units_per_step` units of work
/// per step.  Budget left over after finishing a task flows into the next
/// one within the same step.
#[derive(Debug)]
pub struct Consumer {
    pub(crate) units_per_step:  u64,
    pub(crate) queue:           VecDeque<Task>,
    pub(crate) completed:       u64,
    pub(crate) completed_units: u64,
}

impl Consumer {
    /// Only built through [`EntityTree::add_consumer`][crate::EntityTree::add_consumer],
    /// which rejects a zero rate, so `delay` never divides by zero.
    pub(crate) fn new(units_per_step: u64) -> Self {
        Self {
            units_per_step,
            queue:           VecDeque::new(),
            completed:       0,
            completed_units: 0,
        }
    }

    pub fn units_per_step(&self) -> u64 {
        self.units_per_step
    }

    pub fn submit_task(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    pub fn queue(&self) -> &VecDeque<Task> {
        &self.queue
    }

    /// Remaining units across every queued task.
    pub fn queued_units(&self) -> u64 {
        self.queue.iter().map(Task::remaining_units).sum()
    }

    /// Steps until everything queued has finished.
    pub fn delay(&self) -> f64 {
        self.queued_units() as f64 / self.units_per_step as f64
    }

    pub fn tasks_completed(&self) -> u64 {
        self.completed
    }

    pub fn units_completed(&self) -> u64 {
        self.completed_units
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run one step of work.  Returns the ids of tasks that finished.
    pub(crate) fn execute(&mut self) -> Vec<TaskId> {
        let mut budget = self.units_per_step;
        let mut finished = Vec::new();
        while let Some(head) = self.queue.front_mut() {
            let spent = head.execute(budget);
            budget -= spent;
            self.completed_units += spent;
            if !head.is_complete() {
                break;
            }
            finished.push(head.id());
            self.queue.pop_front();
            self.completed += 1;
        }
        finished
    }
}
