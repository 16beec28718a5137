//! State access for the dashboard core.
//!
//! # Overview
//!
//! The original dashboard reached into ambient context for its data. Here
//! every consumer receives a [`ProjectStore`] explicitly — the presentation
//! layer drives user intents through this trait and renders the plain data
//! it returns.
//!
//! [`memory::MemoryStore`] is the only implementation: a `BTreeMap`-backed
//! aggregate holder for a single logical session. Seed data arrives through
//! the [`seed::DataSource`] seam, which stands in for the (simulated)
//! network fetch the dashboard performed at startup.
//!
//! # Guard ordering
//!
//! Every mutating operation validates its inputs first (empty required
//! fields), then checks invariants (blocked tasks, dependents, cycles, role
//! gates), and only then mutates. A returned error always means "nothing
//! changed".

pub mod memory;
pub mod seed;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ErrorCode;
use crate::graph::blocking::TaskGraph;
use crate::handover::HandoverError;
use crate::model::project::{HandoverRecord, Project, ProjectStatus};
use crate::model::task::{TaskDraft, TaskPatch};
use crate::model::user::{Actor, Role, User};
use crate::workflow::{LpjPatch, WorkflowError};

/// Errors from store operations. Checked before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// The task cannot be completed while dependencies are open. Carries the
    /// blocking task titles for the UI to enumerate.
    #[error("task '{task}' is blocked by: {}", blockers.join(", "))]
    TaskBlocked { task: String, blockers: Vec<String> },

    /// The task cannot be deleted while other tasks depend on it. Carries
    /// the dependent task titles for the UI to enumerate.
    #[error("task '{task}' is a prerequisite of: {}", dependents.join(", "))]
    TaskHasDependents {
        task: String,
        dependents: Vec<String>,
    },

    /// The dependency edge would close the given loop.
    #[error("dependency would create a cycle: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    #[error(transparent)]
    Handover(#[from] HandoverError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            Self::TaskNotFound(_) => ErrorCode::TaskNotFound,
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::TaskBlocked { .. } => ErrorCode::TaskBlocked,
            Self::TaskHasDependents { .. } => ErrorCode::TaskHasDependents,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::Handover(err) => err.code(),
            Self::Workflow(err) => err.code(),
        }
    }
}

/// The state-access interface handed to every consumer of the core.
pub trait ProjectStore {
    // --- users -----------------------------------------------------------

    /// Register a user and return the assigned id.
    ///
    /// # Errors
    ///
    /// Rejects blank names.
    fn add_user(&mut self, name: &str, role: Role) -> Result<String, StoreError>;

    fn user(&self, user_id: &str) -> Option<&User>;

    fn users(&self) -> Vec<&User>;

    // --- projects --------------------------------------------------------

    /// Create a project with the given PIC and return the assigned id.
    ///
    /// # Errors
    ///
    /// Rejects blank names and unknown PIC ids.
    fn create_project(&mut self, name: &str, pic: &str) -> Result<String, StoreError>;

    fn project(&self, project_id: &str) -> Option<&Project>;

    fn projects(&self) -> Vec<&Project>;

    /// # Errors
    ///
    /// Fails for unknown projects.
    fn set_project_status(
        &mut self,
        project_id: &str,
        status: ProjectStatus,
    ) -> Result<(), StoreError>;

    // --- tasks -----------------------------------------------------------

    /// Create a task from a draft and return the assigned id.
    ///
    /// # Errors
    ///
    /// Rejects blank titles and unknown assignees.
    fn create_task(&mut self, project_id: &str, draft: TaskDraft) -> Result<String, StoreError>;

    /// Apply a partial update to a task.
    ///
    /// # Errors
    ///
    /// Rejects blank titles and unknown assignees; fails for unknown tasks.
    fn update_task(
        &mut self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<(), StoreError>;

    /// Mark a task completed. Completing an already-completed task is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// [`StoreError::TaskBlocked`] while any dependency is incomplete.
    fn complete_task(&mut self, project_id: &str, task_id: &str) -> Result<(), StoreError>;

    /// Delete a task no other task depends on.
    ///
    /// # Errors
    ///
    /// [`StoreError::TaskHasDependents`] with the dependent titles otherwise.
    fn delete_task(&mut self, project_id: &str, task_id: &str) -> Result<(), StoreError>;

    // --- dependencies ----------------------------------------------------

    /// Add `task depends-on dep`. Adding an existing edge is a no-op.
    ///
    /// # Errors
    ///
    /// [`StoreError::CycleDetected`] when the edge would close a loop;
    /// not-found errors for unknown ids.
    fn add_dependency(
        &mut self,
        project_id: &str,
        task_id: &str,
        dep_id: &str,
    ) -> Result<(), StoreError>;

    /// Remove a dependency edge. Removing an absent edge is a no-op.
    ///
    /// # Errors
    ///
    /// Fails for unknown projects or tasks.
    fn remove_dependency(
        &mut self,
        project_id: &str,
        task_id: &str,
        dep_id: &str,
    ) -> Result<(), StoreError>;

    /// Valid choices for a new dependency of `task_id`: every other task
    /// that is not already a dependency and does not (transitively) depend
    /// on `task_id`.
    ///
    /// # Errors
    ///
    /// Fails for unknown projects or tasks.
    fn dependency_choices(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Vec<String>, StoreError>;

    /// A snapshot graph over the project's tasks, for blocked/ready queries.
    ///
    /// # Errors
    ///
    /// Fails for unknown projects.
    fn task_graph(&self, project_id: &str) -> Result<TaskGraph, StoreError>;

    // --- handover --------------------------------------------------------

    /// Initiate a PIC transfer and return the record id.
    ///
    /// # Errors
    ///
    /// Fails for unknown users, when `from_pic` is not the current PIC, or
    /// when the target already is the PIC.
    fn initiate_handover(
        &mut self,
        project_id: &str,
        from_pic: &str,
        to_pic: &str,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError>;

    /// # Errors
    ///
    /// Fails for unknown or already-confirmed records.
    fn confirm_handover(
        &mut self,
        project_id: &str,
        record_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Transfer history, most recent first.
    ///
    /// # Errors
    ///
    /// Fails for unknown projects.
    fn handover_history(&self, project_id: &str) -> Result<Vec<&HandoverRecord>, StoreError>;

    // --- LPJ -------------------------------------------------------------

    /// Create the draft LPJ for a completed project and return its id.
    ///
    /// # Errors
    ///
    /// See [`crate::workflow::create`].
    fn create_lpj(&mut self, project_id: &str, actor: &Actor) -> Result<String, StoreError>;

    /// # Errors
    ///
    /// See [`crate::workflow::submit`].
    fn submit_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// See [`crate::workflow::request_revision`].
    fn request_lpj_revision(
        &mut self,
        project_id: &str,
        actor: &Actor,
        notes: &str,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// See [`crate::workflow::approve`].
    fn approve_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// See [`crate::workflow::edit`].
    fn edit_lpj(
        &mut self,
        project_id: &str,
        actor: &Actor,
        patch: LpjPatch,
    ) -> Result<(), StoreError>;
}
