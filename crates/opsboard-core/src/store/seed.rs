//! Seed data and the simulated initial load.
//!
//! # Overview
//!
//! The dashboard has no backend; it boots from mock data behind a simulated
//! network delay. [`DataSource`] is that seam: a load either resolves with a
//! full [`SeedData`] payload or fails, and a failure leaves the store's
//! local state untouched. There is no retry, timeout, or cancellation — the
//! user retries.
//!
//! [`MockDataSource`] is the only implementation; a real repository-backed
//! source would slot in here if this were ever productionized.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SeedConfig;
use crate::error::ErrorCode;
use crate::graph::blocking::TaskGraph;
use crate::graph::cycles::find_all_cycles;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Priority, Task};
use crate::model::user::{Role, User};

/// Everything a fresh session starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
}

/// Counts reported after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub users: usize,
    pub projects: usize,
    pub tasks: usize,
}

/// Errors from the initial load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The source itself failed (the simulated network error).
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The payload arrived but violates store invariants.
    #[error("seed data invalid: {0}")]
    Invalid(String),
}

impl SourceError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable(_) | Self::Invalid(_) => ErrorCode::SeedLoadFailed,
        }
    }
}

/// A source of initial dashboard state.
pub trait DataSource {
    /// Fetch the full payload.
    ///
    /// # Errors
    ///
    /// [`SourceError::Unavailable`] when the fetch fails.
    fn load(&self) -> Result<SeedData, SourceError>;
}

/// In-process source with optional simulated latency and failure injection.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    data: SeedData,
    delay: Duration,
    fail: bool,
}

impl MockDataSource {
    #[must_use]
    pub fn new(data: SeedData) -> Self {
        Self {
            data,
            delay: Duration::ZERO,
            fail: false,
        }
    }

    /// Apply the `[seed]` config section (latency and failure injection).
    #[must_use]
    pub fn from_config(config: &SeedConfig, data: SeedData) -> Self {
        Self {
            data,
            delay: Duration::from_millis(config.simulated_delay_ms),
            fail: config.fail_load,
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl DataSource for MockDataSource {
    fn load(&self) -> Result<SeedData, SourceError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail {
            return Err(SourceError::Unavailable(
                "simulated network failure".to_string(),
            ));
        }
        Ok(self.data.clone())
    }
}

/// Check a payload against store invariants before it replaces state:
/// every project PIC and task assignee must be a seeded user, and every
/// task dependency graph must be acyclic.
///
/// # Errors
///
/// [`SourceError::Invalid`] naming the first violation found.
pub fn validate_seed(data: &SeedData) -> Result<(), SourceError> {
    let user_ids: std::collections::BTreeSet<&str> =
        data.users.iter().map(|u| u.id.as_str()).collect();

    for project in &data.projects {
        if !user_ids.contains(project.pic.as_str()) {
            return Err(SourceError::Invalid(format!(
                "project '{}' has unknown PIC '{}'",
                project.id, project.pic
            )));
        }
        for task in project.tasks.values() {
            if let Some(assignee) = &task.assignee {
                if !user_ids.contains(assignee.as_str()) {
                    return Err(SourceError::Invalid(format!(
                        "task '{}' has unknown assignee '{assignee}'",
                        task.id
                    )));
                }
            }
        }

        let graph = TaskGraph::from_tasks(&project.tasks);
        if let Some(cycle) = find_all_cycles(&graph).into_iter().next() {
            return Err(SourceError::Invalid(format!(
                "project '{}' has a dependency cycle: {cycle}",
                project.id
            )));
        }
    }

    Ok(())
}

/// The fixture a fresh demo session boots from: a small team, one active
/// project with a dependency chain, and one completed project awaiting its
/// LPJ.
#[must_use]
pub fn demo_data() -> SeedData {
    let day = |m: u32, d: u32| {
        chrono::NaiveDate::from_ymd_opt(2026, m, d).unwrap_or_default()
    };

    let users = vec![
        User {
            id: "usr-1".into(),
            name: "Adi Nugroho".into(),
            role: Role::Admin,
        },
        User {
            id: "usr-2".into(),
            name: "Bella Hartono".into(),
            role: Role::Manager,
        },
        User {
            id: "usr-3".into(),
            name: "Citra Lestari".into(),
            role: Role::Pic,
        },
        User {
            id: "usr-4".into(),
            name: "Dimas Putra".into(),
            role: Role::Staff,
        },
    ];

    let task = |id: &str,
                title: &str,
                assignee: &str,
                due: chrono::NaiveDate,
                priority: Priority,
                completed: bool,
                deps: &[&str]| {
        (
            id.to_string(),
            Task {
                id: id.to_string(),
                title: title.to_string(),
                assignee: Some(assignee.to_string()),
                due_date: due,
                priority,
                completed,
                dependencies: deps.iter().map(ToString::to_string).collect(),
            },
        )
    };

    let mut launch = Project::new("prj-1", "Product Launch Night", "usr-3");
    launch.status = ProjectStatus::Active;
    launch.tasks = [
        task("tsk-1", "Book venue", "usr-3", day(9, 1), Priority::High, true, &[]),
        task("tsk-2", "Confirm catering", "usr-4", day(9, 5), Priority::Medium, false, &["tsk-1"]),
        task("tsk-3", "Send invitations", "usr-4", day(9, 10), Priority::High, false, &["tsk-1"]),
        task("tsk-4", "Run final rehearsal", "usr-3", day(9, 14), Priority::Medium, false, &["tsk-2", "tsk-3"]),
    ]
    .into_iter()
    .collect();

    let mut retreat = Project::new("prj-2", "Company Retreat 2026", "usr-3");
    retreat.status = ProjectStatus::Completed;
    retreat.tasks = [task(
        "tsk-5",
        "Collect vendor invoices",
        "usr-4",
        day(8, 20),
        Priority::Low,
        true,
        &[],
    )]
    .into_iter()
    .collect();
    // Completed and LPJ-less on purpose: the demo walks through creating one.

    SeedData {
        users,
        projects: vec![launch, retreat],
    }
}
