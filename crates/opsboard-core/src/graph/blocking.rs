//! Blocking dependency graph materialized from a project's tasks.
//!
//! # Overview
//!
//! A task lists its prerequisites in `Task::dependencies`. This module builds
//! an immutable snapshot graph over those links and answers the scheduling
//! questions the dashboard needs:
//!
//! - **blocked**: a task is blocked while at least one dependency is not
//!   completed. Blocked tasks cannot be marked complete.
//! - **dependents**: tasks whose `dependencies` include a given task, directly
//!   or transitively. A task with dependents cannot be deleted.
//!
//! # Data model
//!
//! The graph is keyed by task id. A dependency id that is missing from the
//! snapshot (e.g. seeded data referencing a task that was never loaded) is
//! treated as incomplete and therefore blocks — a dangling prerequisite must
//! never silently unblock work.
//!
//! The graph is immutable once built. Call [`TaskGraph::from_tasks`] again
//! after any task mutation.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::model::task::Task;

// ---------------------------------------------------------------------------
// TaskGraph
// ---------------------------------------------------------------------------

/// A snapshot of the task dependency graph for one project.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    /// task_id → its prerequisite task ids.
    dependencies: HashMap<String, BTreeSet<String>>,
    /// task_id → tasks that directly list it as a prerequisite.
    dependents: HashMap<String, BTreeSet<String>>,
    /// Ids of tasks with `completed = false`.
    incomplete: HashSet<String>,
    /// All task ids present in the snapshot.
    all_tasks: BTreeSet<String>,
}

impl TaskGraph {
    /// Build a graph from a project's task map.
    ///
    /// # Complexity
    ///
    /// O(N * D) where N is the number of tasks and D the average number of
    /// dependencies per task.
    pub fn from_tasks(tasks: &BTreeMap<String, Task>) -> Self {
        let mut graph = Self {
            all_tasks: tasks.keys().cloned().collect(),
            ..Self::default()
        };

        for (task_id, task) in tasks {
            if !task.completed {
                graph.incomplete.insert(task_id.clone());
            }
            if task.dependencies.is_empty() {
                continue;
            }
            graph
                .dependencies
                .insert(task_id.clone(), task.dependencies.clone());
            for dep in &task.dependencies {
                graph
                    .dependents
                    .entry(dep.clone())
                    .or_default()
                    .insert(task_id.clone());
            }
        }

        graph
    }

    /// Returns `true` iff at least one dependency of the task is not
    /// completed. Tasks without dependencies (and unknown ids) are never
    /// blocked.
    pub fn is_blocked(&self, task_id: &str) -> bool {
        self.dependencies
            .get(task_id)
            .is_some_and(|deps| deps.iter().any(|dep| !self.is_complete(dep)))
    }

    /// The incomplete dependencies currently blocking the task.
    ///
    /// Empty when the task is not blocked or not known.
    pub fn blockers(&self, task_id: &str) -> BTreeSet<&str> {
        self.dependencies
            .get(task_id)
            .map(|deps| {
                deps.iter()
                    .filter(|dep| !self.is_complete(dep))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The declared prerequisites of a task, complete or not.
    pub fn dependencies_of(&self, task_id: &str) -> BTreeSet<&str> {
        self.dependencies
            .get(task_id)
            .map(|deps| deps.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Tasks that directly list `task_id` as a prerequisite.
    pub fn direct_dependents(&self, task_id: &str) -> BTreeSet<&str> {
        self.dependents
            .get(task_id)
            .map(|deps| deps.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Transitive closure of tasks that depend on `task_id`, directly or
    /// through intermediate tasks.
    ///
    /// The result never contains `task_id` itself while the graph is acyclic,
    /// which the store guarantees by running the cycle guard on every edge
    /// insertion. The dependency picker excludes this set (plus the task
    /// itself) so the user cannot be offered an edge that closes a cycle.
    ///
    /// # Complexity
    ///
    /// O(V+E) breadth-first walk over dependent edges.
    pub fn upstream_dependents(&self, task_id: &str) -> BTreeSet<String> {
        let mut closure: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(task_id);

        while let Some(current) = queue.pop_front() {
            if let Some(dependents) = self.dependents.get(current) {
                for dependent in dependents {
                    if dependent != task_id && closure.insert(dependent.clone()) {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        closure
    }

    /// Returns `false` when another task lists `task_id` as a prerequisite.
    /// Deletion must be rejected in that case.
    pub fn can_delete(&self, task_id: &str) -> bool {
        self.dependents
            .get(task_id)
            .is_none_or(BTreeSet::is_empty)
    }

    /// Incomplete tasks with no incomplete prerequisites, in id order.
    pub fn ready_tasks(&self) -> Vec<&str> {
        self.all_tasks
            .iter()
            .filter(|id| self.incomplete.contains(id.as_str()) && !self.is_blocked(id))
            .map(String::as_str)
            .collect()
    }

    /// All task ids in the snapshot, in id order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.all_tasks.iter().map(String::as_str)
    }

    /// Number of tasks in the snapshot.
    pub fn len(&self) -> usize {
        self.all_tasks.len()
    }

    /// Returns `true` if the snapshot has no tasks.
    pub fn is_empty(&self) -> bool {
        self.all_tasks.is_empty()
    }

    /// A dependency counts as complete only when it is present in the
    /// snapshot and marked completed. Dangling ids block.
    fn is_complete(&self, task_id: &str) -> bool {
        self.all_tasks.contains(task_id) && !self.incomplete.contains(task_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
