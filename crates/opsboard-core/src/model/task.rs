use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Task priority as shown in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A project task with optional prerequisite links.
///
/// `dependencies` holds the ids of tasks that must be completed before this
/// one becomes unblocked. The set is kept acyclic by the store (every edge
/// goes through the cycle guard in [`crate::graph::cycles`]); a task never
/// depends on itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
}

/// Input for creating a task. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
}

impl TaskDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            assignee: None,
            due_date,
            priority: Priority::default(),
        }
    }

    #[must_use]
    pub fn assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assignee = Some(user_id.into());
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update for an existing task. `None` fields are left untouched.
///
/// Completion is not part of the patch — it goes through the guarded
/// `complete_task` operation so the blocked check cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub assignee: Option<Option<String>>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}
