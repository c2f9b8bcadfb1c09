#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Task registry that assigns campus errands and rewards their completion.

use std::collections::{BTreeMap, BTreeSet};

use campus_runner_core::{CellCoord, Command, Event, PlayState};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errand the player completes by walking to a building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: String,
    /// Short title shown in the HUD.
    pub name: String,
    /// Name of the building that completes the task.
    pub building: String,
    /// Riddle describing the destination.
    pub riddle: String,
    /// Points awarded on completion.
    pub points: u32,
    /// Plain-language hint.
    pub hint: String,
}

/// Outcome of the player arriving at the current task's building.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Identifier of the task that was completed.
    pub task_id: String,
    /// Points awarded.
    pub points: u32,
    /// Identifier of the task assigned next, if any remain.
    pub next: Option<String>,
}

/// Registry of every task in the session.
#[derive(Clone, Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    completed: BTreeSet<String>,
    current: Option<usize>,
}

impl TaskRegistry {
    /// Creates a registry holding `tasks` in the provided order.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut registry = Self::default();
        for task in tasks {
            registry.add(task);
        }
        registry
    }

    /// Adds a task, replacing any existing task with the same identifier.
    pub fn add(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|known| known.id == task.id) {
            *existing = task;
        } else {
            self.tasks.push(task);
        }
    }

    /// Makes `task_id` the current task.
    ///
    /// Unknown and already completed tasks are refused.
    pub fn assign(&mut self, task_id: &str) -> bool {
        if self.completed.contains(task_id) {
            return false;
        }
        let Some(index) = self.tasks.iter().position(|task| task.id == task_id) else {
            return false;
        };
        self.current = Some(index);
        true
    }

    /// Marks `task_id` completed if it is the current task.
    pub fn complete(&mut self, task_id: &str) -> bool {
        match self.current() {
            Some(current) if current.id == task_id => {
                let _ = self.completed.insert(task_id.to_owned());
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Picks a uniformly random task that is not yet completed.
    pub fn next_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let available: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| !self.completed.contains(&task.id))
            .collect();
        available.choose(rng).map(|task| task.id.clone())
    }

    /// Assigns a random uncompleted task, returning its identifier.
    pub fn assign_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        let next = self.next_task(rng)?;
        if self.assign(&next) {
            Some(next)
        } else {
            None
        }
    }

    /// Task the player is currently working on.
    #[must_use]
    pub fn current(&self) -> Option<&Task> {
        self.current.and_then(|index| self.tasks.get(index))
    }

    /// Looks a task up by identifier.
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Reports whether `task_id` has been completed.
    #[must_use]
    pub fn is_completed(&self, task_id: &str) -> bool {
        self.completed.contains(task_id)
    }

    /// Number of completed tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Reports whether no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Checks player arrivals against the current task's building.
    ///
    /// Completing a task emits `AwardPoints`, assigns a new task and, once no
    /// task remains, requests the `Victory` play state.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        events: &[Event],
        buildings: &BTreeMap<String, CellCoord>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Option<Completion> {
        let mut completion = None;
        for event in events {
            let arrived = match event {
                Event::PlayerMoved { to, .. } | Event::PlayerRelocated { to, .. } => *to,
                _ => continue,
            };
            let Some(task) = self.current().cloned() else {
                continue;
            };
            if buildings.get(&task.building) != Some(&arrived) {
                continue;
            }
            if !self.complete(&task.id) {
                continue;
            }

            info!(task = %task.id, name = %task.name, points = task.points, "task completed");
            out.push(Command::AwardPoints {
                points: task.points,
            });
            let next = self.assign_next(rng);
            match &next {
                Some(next) => info!(task = %next, "task assigned"),
                None => {
                    info!("all tasks completed");
                    out.push(Command::SetPlayState {
                        state: PlayState::Victory,
                    });
                }
            }
            completion = Some(Completion {
                task_id: task.id,
                points: task.points,
                next,
            });
        }
        completion
    }
}
