//! `BTreeMap`-backed single-session store.

#![allow(clippy::module_name_repetitions)]

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use crate::config::ProjectConfig;
use crate::graph::blocking::TaskGraph;
use crate::graph::cycles::detect_cycle_on_add;
use crate::handover;
use crate::model::project::{HandoverRecord, Project, ProjectStatus};
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::model::user::{Actor, Role, User};
use crate::workflow::{self, LpjPatch};

use super::seed::{DataSource, LoadStats, SourceError, validate_seed};
use super::{ProjectStore, StoreError};

/// Monotonic per-prefix id assignment (`usr-1`, `prj-1`, `tsk-1`, ...).
///
/// Counters never move backwards; seeded ids bump them past the highest
/// numeric suffix seen so fresh ids cannot collide.
#[derive(Debug, Clone, Default)]
struct IdGen {
    counters: HashMap<&'static str, u64>,
}

impl IdGen {
    fn next(&mut self, prefix: &'static str) -> String {
        let counter = self.counters.entry(prefix).or_insert(0);
        *counter += 1;
        format!("{prefix}-{counter}")
    }

    fn note_existing(&mut self, id: &str) {
        let Some((prefix, suffix)) = id.rsplit_once('-') else {
            return;
        };
        let Ok(n) = suffix.parse::<u64>() else {
            return;
        };
        for known in ["usr", "prj", "tsk", "ho", "lpj"] {
            if prefix == known {
                let counter = self.counters.entry(known).or_insert(0);
                *counter = (*counter).max(n);
            }
        }
    }
}

/// The in-memory aggregate holder. One instance per logical session; all
/// mutation is synchronous and single-threaded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, User>,
    projects: BTreeMap<String, Project>,
    config: ProjectConfig,
    ids: IdGen,
}

impl MemoryStore {
    #[must_use]
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Replace store contents with data from a source.
    ///
    /// All-or-nothing: on any load or validation failure the store keeps its
    /// previous contents untouched. There is no retry — the caller (user)
    /// retries.
    ///
    /// # Errors
    ///
    /// [`SourceError::Unavailable`] from the source itself, or
    /// [`SourceError::Invalid`] when the seed violates graph or reference
    /// invariants.
    pub fn load_from(&mut self, source: &dyn DataSource) -> Result<LoadStats, SourceError> {
        let data = source.load().inspect_err(|err| {
            warn!(%err, "initial data load failed; local state untouched");
        })?;
        validate_seed(&data)?;

        self.users = data.users.into_iter().map(|u| (u.id.clone(), u)).collect();
        self.projects = data
            .projects
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        for id in self.users.keys() {
            self.ids.note_existing(id);
        }
        let mut task_count = 0usize;
        for project in self.projects.values() {
            self.ids.note_existing(&project.id);
            for task_id in project.tasks.keys() {
                self.ids.note_existing(task_id);
                task_count += 1;
            }
            for record in &project.handovers {
                self.ids.note_existing(&record.id);
            }
            if let Some(lpj) = &project.lpj {
                self.ids.note_existing(&lpj.id);
            }
        }

        let stats = LoadStats {
            users: self.users.len(),
            projects: self.projects.len(),
            tasks: task_count,
        };
        info!(users = stats.users, projects = stats.projects, tasks = stats.tasks, "seed loaded");
        Ok(stats)
    }

    fn project_ref(&self, project_id: &str) -> Result<&Project, StoreError> {
        self.projects
            .get(project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))
    }

    fn project_mut(&mut self, project_id: &str) -> Result<&mut Project, StoreError> {
        self.projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))
    }

    fn check_assignee(&self, assignee: Option<&str>) -> Result<(), StoreError> {
        match assignee {
            Some(user_id) if !self.users.contains_key(user_id) => {
                Err(StoreError::UserNotFound(user_id.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Map task ids to display titles for user-facing guard errors.
    fn titles_of(project: &Project, ids: impl IntoIterator<Item = String>) -> Vec<String> {
        ids.into_iter()
            .map(|id| {
                project
                    .tasks
                    .get(&id)
                    .map_or(id, |task| task.title.clone())
            })
            .collect()
    }
}

fn require_nonempty(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl ProjectStore for MemoryStore {
    fn add_user(&mut self, name: &str, role: Role) -> Result<String, StoreError> {
        require_nonempty("user name", name)?;
        let id = self.ids.next("usr");
        self.users.insert(
            id.clone(),
            User {
                id: id.clone(),
                name: name.trim().to_string(),
                role,
            },
        );
        debug!(user = %id, %role, "user added");
        Ok(id)
    }

    fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    fn users(&self) -> Vec<&User> {
        self.users.values().collect()
    }

    fn create_project(&mut self, name: &str, pic: &str) -> Result<String, StoreError> {
        require_nonempty("project name", name)?;
        if !self.users.contains_key(pic) {
            return Err(StoreError::UserNotFound(pic.to_string()));
        }
        let id = self.ids.next("prj");
        self.projects
            .insert(id.clone(), Project::new(id.clone(), name.trim(), pic));
        info!(project = %id, %pic, "project created");
        Ok(id)
    }

    fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.get(project_id)
    }

    fn projects(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }

    fn set_project_status(
        &mut self,
        project_id: &str,
        status: ProjectStatus,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        debug!(project = %project_id, from = %project.status, to = %status, "project status changed");
        project.status = status;
        Ok(())
    }

    fn create_task(&mut self, project_id: &str, draft: TaskDraft) -> Result<String, StoreError> {
        require_nonempty("task title", &draft.title)?;
        self.check_assignee(draft.assignee.as_deref())?;
        self.project_ref(project_id)?;

        let id = self.ids.next("tsk");
        let task = Task {
            id: id.clone(),
            title: draft.title.trim().to_string(),
            assignee: draft.assignee,
            due_date: draft.due_date,
            priority: draft.priority,
            completed: false,
            dependencies: std::collections::BTreeSet::new(),
        };
        // Lookup checked above.
        if let Some(project) = self.projects.get_mut(project_id) {
            project.tasks.insert(id.clone(), task);
        }
        debug!(project = %project_id, task = %id, "task created");
        Ok(id)
    }

    fn update_task(
        &mut self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        if let Some(title) = &patch.title {
            require_nonempty("task title", title)?;
        }
        if let Some(assignee) = &patch.assignee {
            self.check_assignee(assignee.as_deref())?;
        }

        let project = self.project_mut(project_id)?;
        let task = project
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(assignee) = patch.assignee {
            task.assignee = assignee;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        Ok(())
    }

    fn complete_task(&mut self, project_id: &str, task_id: &str) -> Result<(), StoreError> {
        let project = self.project_ref(project_id)?;
        let task = project
            .task(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        if task.completed {
            debug!(project = %project_id, task = %task_id, "task already completed");
            return Ok(());
        }

        let graph = TaskGraph::from_tasks(&project.tasks);
        if graph.is_blocked(task_id) {
            let blockers = Self::titles_of(
                project,
                graph.blockers(task_id).into_iter().map(ToString::to_string),
            );
            warn!(project = %project_id, task = %task_id, ?blockers, "completion blocked");
            return Err(StoreError::TaskBlocked {
                task: task_id.to_string(),
                blockers,
            });
        }

        if let Some(project) = self.projects.get_mut(project_id) {
            if let Some(task) = project.tasks.get_mut(task_id) {
                task.completed = true;
            }
        }
        info!(project = %project_id, task = %task_id, "task completed");
        Ok(())
    }

    fn delete_task(&mut self, project_id: &str, task_id: &str) -> Result<(), StoreError> {
        let project = self.project_ref(project_id)?;
        if !project.tasks.contains_key(task_id) {
            return Err(StoreError::TaskNotFound(task_id.to_string()));
        }

        let graph = TaskGraph::from_tasks(&project.tasks);
        if !graph.can_delete(task_id) {
            let dependents = Self::titles_of(
                project,
                graph
                    .direct_dependents(task_id)
                    .into_iter()
                    .map(ToString::to_string),
            );
            warn!(project = %project_id, task = %task_id, ?dependents, "deletion blocked");
            return Err(StoreError::TaskHasDependents {
                task: task_id.to_string(),
                dependents,
            });
        }

        if let Some(project) = self.projects.get_mut(project_id) {
            project.tasks.remove(task_id);
        }
        info!(project = %project_id, task = %task_id, "task deleted");
        Ok(())
    }

    fn add_dependency(
        &mut self,
        project_id: &str,
        task_id: &str,
        dep_id: &str,
    ) -> Result<(), StoreError> {
        let project = self.project_ref(project_id)?;
        if !project.tasks.contains_key(task_id) {
            return Err(StoreError::TaskNotFound(task_id.to_string()));
        }
        if !project.tasks.contains_key(dep_id) {
            return Err(StoreError::TaskNotFound(dep_id.to_string()));
        }

        let graph = TaskGraph::from_tasks(&project.tasks);
        if let Some(cycle) = detect_cycle_on_add(&graph, task_id, dep_id) {
            warn!(project = %project_id, task = %task_id, dep = %dep_id, %cycle, "dependency rejected");
            return Err(StoreError::CycleDetected { path: cycle.nodes });
        }

        if let Some(project) = self.projects.get_mut(project_id) {
            if let Some(task) = project.tasks.get_mut(task_id) {
                task.dependencies.insert(dep_id.to_string());
            }
        }
        debug!(project = %project_id, task = %task_id, dep = %dep_id, "dependency added");
        Ok(())
    }

    fn remove_dependency(
        &mut self,
        project_id: &str,
        task_id: &str,
        dep_id: &str,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        let task = project
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        task.dependencies.remove(dep_id);
        Ok(())
    }

    fn dependency_choices(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        let project = self.project_ref(project_id)?;
        let task = project
            .task(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;

        let graph = TaskGraph::from_tasks(&project.tasks);
        let upstream = graph.upstream_dependents(task_id);
        Ok(project
            .tasks
            .keys()
            .filter(|id| {
                id.as_str() != task_id
                    && !upstream.contains(id.as_str())
                    && !task.dependencies.contains(id.as_str())
            })
            .cloned()
            .collect())
    }

    fn task_graph(&self, project_id: &str) -> Result<TaskGraph, StoreError> {
        Ok(TaskGraph::from_tasks(&self.project_ref(project_id)?.tasks))
    }

    fn initiate_handover(
        &mut self,
        project_id: &str,
        from_pic: &str,
        to_pic: &str,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        if !self.users.contains_key(to_pic) {
            return Err(StoreError::UserNotFound(to_pic.to_string()));
        }
        self.project_ref(project_id)?;
        let policy = self.config.workflow.handover_policy();
        let record_id = self.ids.next("ho");
        let project = self.project_mut(project_id)?;
        let record = handover::initiate(project, record_id, from_pic, to_pic, now, policy)?;
        Ok(record.id)
    }

    fn confirm_handover(
        &mut self,
        project_id: &str,
        record_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let policy = self.config.workflow.handover_policy();
        let project = self.project_mut(project_id)?;
        handover::confirm(project, record_id, now, policy)?;
        Ok(())
    }

    fn handover_history(&self, project_id: &str) -> Result<Vec<&HandoverRecord>, StoreError> {
        Ok(handover::history(self.project_ref(project_id)?))
    }

    fn create_lpj(&mut self, project_id: &str, actor: &Actor) -> Result<String, StoreError> {
        self.project_ref(project_id)?;
        let lpj_id = self.ids.next("lpj");
        let project = self.project_mut(project_id)?;
        workflow::create(project, lpj_id.clone(), actor)?;
        Ok(lpj_id)
    }

    fn submit_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        workflow::submit(project, actor, today)?;
        Ok(())
    }

    fn request_lpj_revision(
        &mut self,
        project_id: &str,
        actor: &Actor,
        notes: &str,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        workflow::request_revision(project, actor, notes)?;
        Ok(())
    }

    fn approve_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        workflow::approve(project, actor, today)?;
        Ok(())
    }

    fn edit_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        patch: LpjPatch,
    ) -> Result<(), StoreError> {
        let project = self.project_mut(project_id)?;
        workflow::edit(project, actor, patch)?;
        Ok(())
    }
}
