use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// The four dashboard roles.
///
/// `Pic` is a role label only — whether a user is *the* PIC of a given
/// project is decided by comparing their id against `Project::pic`, not by
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Pic,
    Staff,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Pic => "pic",
            Self::Staff => "staff",
        }
    }

    /// Reviewers may request LPJ revisions and approve LPJs.
    #[must_use]
    pub const fn is_reviewer(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

/// A dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// The acting identity passed into role-gated operations.
///
/// Operations that are open to "the PIC" compare `user_id` against the
/// project's current `pic` field; operations open to reviewers check
/// [`Role::is_reviewer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Returns `true` if this actor is the current PIC of the given project
    /// (by id), regardless of role label.
    #[must_use]
    pub fn is_pic_of(&self, project_pic: &str) -> bool {
        self.user_id == project_pic
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "pic" => Ok(Self::Pic),
            "staff" => Ok(Self::Staff),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}
