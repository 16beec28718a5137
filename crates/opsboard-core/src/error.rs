use std::fmt;

/// Machine-readable error codes for the dashboard front end.
///
/// Every domain error maps to exactly one code via its module's `code()`
/// method. Codes are stable; the presentation layer keys inline messages and
/// blocking alerts off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    ConfigParseError,
    TaskNotFound,
    TaskBlocked,
    TaskHasDependents,
    CycleDetected,
    ProjectNotFound,
    ProjectNotCompleted,
    UserNotFound,
    NotCurrentPic,
    SelfHandover,
    HandoverNotFound,
    HandoverAlreadyConfirmed,
    LpjAlreadyExists,
    LpjNotFound,
    InvalidLpjTransition,
    RoleNotPermitted,
    LpjLocked,
    RevisionNotesRequired,
    SeedLoadFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ValidationFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::TaskNotFound => "E2001",
            Self::TaskBlocked => "E2002",
            Self::TaskHasDependents => "E2003",
            Self::CycleDetected => "E2004",
            Self::ProjectNotFound => "E3001",
            Self::ProjectNotCompleted => "E3002",
            Self::UserNotFound => "E3003",
            Self::NotCurrentPic => "E4001",
            Self::SelfHandover => "E4002",
            Self::HandoverNotFound => "E4003",
            Self::HandoverAlreadyConfirmed => "E4004",
            Self::LpjAlreadyExists => "E5001",
            Self::LpjNotFound => "E5002",
            Self::InvalidLpjTransition => "E5003",
            Self::RoleNotPermitted => "E5004",
            Self::LpjLocked => "E5005",
            Self::RevisionNotesRequired => "E5006",
            Self::SeedLoadFailed => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and inline messages.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ValidationFailed => "Required field missing or invalid",
            Self::ConfigParseError => "Config file parse error",
            Self::TaskNotFound => "Task not found",
            Self::TaskBlocked => "Task is blocked by incomplete dependencies",
            Self::TaskHasDependents => "Task has dependent tasks",
            Self::CycleDetected => "Dependency would create a cycle",
            Self::ProjectNotFound => "Project not found",
            Self::ProjectNotCompleted => "Project is not completed",
            Self::UserNotFound => "User not found",
            Self::NotCurrentPic => "Initiator is not the current PIC",
            Self::SelfHandover => "Handover target is already the PIC",
            Self::HandoverNotFound => "Handover record not found",
            Self::HandoverAlreadyConfirmed => "Handover already confirmed",
            Self::LpjAlreadyExists => "Project already has an LPJ",
            Self::LpjNotFound => "Project has no LPJ",
            Self::InvalidLpjTransition => "Invalid LPJ status transition",
            Self::RoleNotPermitted => "Role not permitted for this action",
            Self::LpjLocked => "LPJ is approved and locked",
            Self::RevisionNotesRequired => "Revision notes are required",
            Self::SeedLoadFailed => "Initial data load failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint the UI can surface next to the message.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ValidationFailed => Some("Fill in the required fields and retry."),
            Self::ConfigParseError => Some("Fix syntax in opsboard.toml and retry."),
            Self::TaskNotFound | Self::ProjectNotFound | Self::UserNotFound => None,
            Self::TaskBlocked => Some("Complete the blocking dependencies first."),
            Self::TaskHasDependents => {
                Some("Remove the dependency links from the listed tasks first.")
            }
            Self::CycleDetected => Some("Pick a dependency that does not depend on this task."),
            Self::ProjectNotCompleted => {
                Some("Mark the project completed before creating its LPJ.")
            }
            Self::NotCurrentPic => Some("Only the current PIC can initiate a handover."),
            Self::SelfHandover => Some("Pick a different user as the new PIC."),
            Self::HandoverNotFound => None,
            Self::HandoverAlreadyConfirmed => None,
            Self::LpjAlreadyExists => Some("Edit the existing LPJ instead."),
            Self::LpjNotFound => Some("Create the LPJ draft first."),
            Self::InvalidLpjTransition => {
                Some("Follow valid transitions: draft -> submitted -> revision/approved.")
            }
            Self::RoleNotPermitted => Some("Ask a manager or admin to perform this step."),
            Self::LpjLocked => Some("Approved reports cannot be changed."),
            Self::RevisionNotesRequired => Some("Describe what needs to change and retry."),
            Self::SeedLoadFailed => Some("Retry the load; local state was not touched."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 21] = [
        ErrorCode::ValidationFailed,
        ErrorCode::ConfigParseError,
        ErrorCode::TaskNotFound,
        ErrorCode::TaskBlocked,
        ErrorCode::TaskHasDependents,
        ErrorCode::CycleDetected,
        ErrorCode::ProjectNotFound,
        ErrorCode::ProjectNotCompleted,
        ErrorCode::UserNotFound,
        ErrorCode::NotCurrentPic,
        ErrorCode::SelfHandover,
        ErrorCode::HandoverNotFound,
        ErrorCode::HandoverAlreadyConfirmed,
        ErrorCode::LpjAlreadyExists,
        ErrorCode::LpjNotFound,
        ErrorCode::InvalidLpjTransition,
        ErrorCode::RoleNotPermitted,
        ErrorCode::LpjLocked,
        ErrorCode::RevisionNotesRequired,
        ErrorCode::SeedLoadFailed,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let rendered = code.code();
            assert_eq!(rendered.len(), 5, "bad code {rendered}");
            assert!(rendered.starts_with('E'));
            assert!(rendered.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn messages_are_nonempty() {
        for code in ALL {
            assert!(!code.message().is_empty());
        }
    }
}
