use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use super::lpj::Lpj;
use super::task::Task;
use super::{ParseEnumError, normalize};

/// Project lifecycle states.
///
/// An LPJ can only be created once the project is `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// One PIC transfer record. Append-only: records are never edited except to
/// set `confirmed_at`, and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverRecord {
    pub id: String,
    pub from_pic: String,
    pub to_pic: String,
    pub initiated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl HandoverRecord {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.confirmed_at.is_none()
    }
}

/// The in-memory aggregate owning tasks, handover history, and the LPJ.
///
/// All child entities live and die with the project; nothing has an
/// independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    /// Current person-in-charge (user id).
    pub pic: String,
    #[serde(default)]
    pub tasks: BTreeMap<String, Task>,
    #[serde(default)]
    pub handovers: Vec<HandoverRecord>,
    #[serde(default)]
    pub lpj: Option<Lpj>,
}

impl Project {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, pic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ProjectStatus::Planning,
            pic: pic.into(),
            tasks: BTreeMap::new(),
            handovers: Vec::new(),
            lpj: None,
        }
    }

    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                expected: "project status",
                got: s.to_string(),
            }),
        }
    }
}
