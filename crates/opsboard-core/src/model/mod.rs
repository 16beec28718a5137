//! Plain data model for the project aggregate.
//!
//! Everything here is serde-serializable plain data. Behavior lives in the
//! operation modules ([`crate::graph`], [`crate::handover`],
//! [`crate::workflow`]) and in the store; the model only carries state plus
//! the pure transition-validity rules on its enums.
//!
//! ## Submodules
//!
//! - [`user`] — users, roles, and the acting identity passed to gated
//!   operations.
//! - [`task`] — tasks, priority, and task dependency sets.
//! - [`lpj`] — the LPJ accountability report and its status machine.
//! - [`project`] — the owning `Project` aggregate and handover records.

pub mod lpj;
pub mod project;
pub mod task;
pub mod user;

use std::fmt;

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
