//! Role-gated LPJ workflow over the status edges in [`crate::model::lpj`].
//!
//! # Overview
//!
//! The status machine is `draft -> submitted -> (revision -> submitted)* ->
//! approved`. Who may drive each edge:
//!
//! | edge                    | allowed actors              |
//! |-------------------------|-----------------------------|
//! | create draft            | project PIC, manager, admin |
//! | draft/revision → submit | project PIC, manager, admin |
//! | submitted → revision    | manager, admin              |
//! | submitted → approved    | manager, admin              |
//!
//! Creation additionally requires the project to be completed. Approval is
//! terminal: after it, every transition and every field edit is rejected, so
//! the financial summary is frozen exactly as submitted.
//!
//! Every guard runs before any mutation; a rejected call leaves the project
//! untouched.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::model::lpj::{FinancialSummary, InvalidTransition, Lpj, LpjStatus};
use crate::model::project::{Project, ProjectStatus};
use crate::model::user::Actor;

/// Errors from LPJ workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("project '{0}' is not completed; an LPJ can only be created afterwards")]
    ProjectNotCompleted(String),

    #[error("project '{0}' already has an LPJ")]
    AlreadyExists(String),

    #[error("project '{0}' has no LPJ")]
    NotFound(String),

    #[error("role '{role}' (user '{user}') may not {action} this LPJ")]
    RoleNotPermitted {
        user: String,
        role: String,
        action: &'static str,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("LPJ '{0}' is approved and locked")]
    Locked(String),

    #[error("LPJ '{0}' is submitted and awaiting review; fields cannot change")]
    PendingReview(String),

    #[error("revision notes are required")]
    RevisionNotesRequired,
}

impl WorkflowError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ProjectNotCompleted(_) => ErrorCode::ProjectNotCompleted,
            Self::AlreadyExists(_) => ErrorCode::LpjAlreadyExists,
            Self::NotFound(_) => ErrorCode::LpjNotFound,
            Self::RoleNotPermitted { .. } => ErrorCode::RoleNotPermitted,
            Self::InvalidTransition(_) | Self::PendingReview(_) => ErrorCode::InvalidLpjTransition,
            Self::Locked(_) => ErrorCode::LpjLocked,
            Self::RevisionNotesRequired => ErrorCode::RevisionNotesRequired,
        }
    }
}

/// Partial update for an editable report. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LpjPatch {
    pub notes: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub financial_summary: Option<FinancialSummary>,
}

/// Create the draft report for a completed project.
///
/// # Errors
///
/// Rejected when the project is not completed, already has an LPJ, or the
/// actor is neither the PIC nor a reviewer.
pub fn create(project: &mut Project, lpj_id: String, actor: &Actor) -> Result<(), WorkflowError> {
    require_submitter(project, actor, "create")?;
    if project.status != ProjectStatus::Completed {
        return Err(WorkflowError::ProjectNotCompleted(project.id.clone()));
    }
    if project.lpj.is_some() {
        return Err(WorkflowError::AlreadyExists(project.id.clone()));
    }

    info!(project = %project.id, lpj = %lpj_id, "LPJ draft created");
    project.lpj = Some(Lpj::draft(lpj_id));
    Ok(())
}

/// Submit a draft (or revised) report for review.
///
/// # Errors
///
/// Rejected for non-PIC/non-reviewer actors and for any status other than
/// `draft` or `revision`.
pub fn submit(project: &mut Project, actor: &Actor, today: NaiveDate) -> Result<(), WorkflowError> {
    require_submitter(project, actor, "submit")?;
    let project_id = project.id.clone();
    let lpj = lpj_mut(project)?;
    lpj.status.can_transition_to(LpjStatus::Submitted)?;

    lpj.status = LpjStatus::Submitted;
    lpj.submitted_at = Some(today);
    info!(project = %project_id, lpj = %lpj.id, "LPJ submitted");
    Ok(())
}

/// Send a submitted report back to the PIC with reviewer notes.
///
/// # Errors
///
/// Reviewer-only; requires non-empty notes; valid only from `submitted`.
pub fn request_revision(
    project: &mut Project,
    actor: &Actor,
    notes: &str,
) -> Result<(), WorkflowError> {
    require_reviewer(actor, "request revision of")?;
    if notes.trim().is_empty() {
        return Err(WorkflowError::RevisionNotesRequired);
    }
    let project_id = project.id.clone();
    let lpj = lpj_mut(project)?;
    lpj.status.can_transition_to(LpjStatus::Revision)?;

    lpj.status = LpjStatus::Revision;
    lpj.revision_notes.push(notes.trim().to_string());
    info!(project = %project_id, lpj = %lpj.id, "LPJ revision requested");
    Ok(())
}

/// Approve a submitted report, stamping today's date and freezing the
/// financial summary.
///
/// # Errors
///
/// Reviewer-only; valid only from `submitted`.
pub fn approve(project: &mut Project, actor: &Actor, today: NaiveDate) -> Result<(), WorkflowError> {
    require_reviewer(actor, "approve")?;
    let project_id = project.id.clone();
    let lpj = lpj_mut(project)?;
    lpj.status.can_transition_to(LpjStatus::Approved)?;

    lpj.status = LpjStatus::Approved;
    lpj.approved_at = Some(today);
    info!(project = %project_id, lpj = %lpj.id, %today, "LPJ approved");
    Ok(())
}

/// Apply field edits to an editable report (`draft` or `revision`).
///
/// # Errors
///
/// [`WorkflowError::Locked`] once approved, [`WorkflowError::PendingReview`]
/// while submitted, and the usual PIC/reviewer gate.
pub fn edit(project: &mut Project, actor: &Actor, patch: LpjPatch) -> Result<(), WorkflowError> {
    require_submitter(project, actor, "edit")?;
    let lpj = lpj_mut(project)?;
    match lpj.status {
        LpjStatus::Approved => return Err(WorkflowError::Locked(lpj.id.clone())),
        LpjStatus::Submitted => return Err(WorkflowError::PendingReview(lpj.id.clone())),
        LpjStatus::Draft | LpjStatus::Revision => {}
    }

    if let Some(notes) = patch.notes {
        lpj.notes = notes;
    }
    if let Some(attachments) = patch.attachments {
        lpj.attachments = attachments;
    }
    if let Some(summary) = patch.financial_summary {
        lpj.financial_summary = summary;
    }
    Ok(())
}

fn lpj_mut(project: &mut Project) -> Result<&mut Lpj, WorkflowError> {
    let id = project.id.clone();
    project.lpj.as_mut().ok_or(WorkflowError::NotFound(id))
}

/// PIC-or-reviewer gate used for create/submit/edit.
fn require_submitter(
    project: &Project,
    actor: &Actor,
    action: &'static str,
) -> Result<(), WorkflowError> {
    if actor.role.is_reviewer() || actor.is_pic_of(&project.pic) {
        return Ok(());
    }
    warn!(user = %actor.user_id, role = %actor.role, action, "LPJ action denied");
    Err(WorkflowError::RoleNotPermitted {
        user: actor.user_id.clone(),
        role: actor.role.to_string(),
        action,
    })
}

/// Reviewer-only gate used for revision requests and approval.
fn require_reviewer(actor: &Actor, action: &'static str) -> Result<(), WorkflowError> {
    if actor.role.is_reviewer() {
        return Ok(());
    }
    warn!(user = %actor.user_id, role = %actor.role, action, "LPJ action denied");
    Err(WorkflowError::RoleNotPermitted {
        user: actor.user_id.clone(),
        role: actor.role.to_string(),
        action,
    })
}
