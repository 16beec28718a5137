//! PIC handover records and confirmation.
//!
//! # Overview
//!
//! A handover moves project accountability from the current PIC to another
//! user. Each transfer appends a [`HandoverRecord`] to the project; records
//! are never edited (beyond setting `confirmed_at`) and never deleted.
//!
//! # Pending vs. immediate transfer
//!
//! The dashboard historically moved `Project::pic` at *initiate* time, so
//! the confirmation step had no gating effect — "pending" was cosmetic.
//! That behavior is preserved as the default. Setting
//! [`HandoverPolicy::require_confirmation`] switches to the strict reading:
//! the PIC field moves only when the incoming user confirms.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::ErrorCode;
use crate::model::project::{HandoverRecord, Project};

/// How `initiate` treats the project's PIC field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandoverPolicy {
    /// When `true`, `Project::pic` changes on confirm instead of initiate.
    pub require_confirmation: bool,
}

/// Errors from handover operations. All are checked before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoverError {
    #[error("user '{0}' is not the current PIC of this project")]
    NotCurrentPic(String),

    #[error("handover target '{0}' is already the current PIC")]
    SelfHandover(String),

    #[error("handover '{0}' not found")]
    NotFound(String),

    #[error("handover '{0}' was already confirmed")]
    AlreadyConfirmed(String),
}

impl HandoverError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotCurrentPic(_) => ErrorCode::NotCurrentPic,
            Self::SelfHandover(_) => ErrorCode::SelfHandover,
            Self::NotFound(_) => ErrorCode::HandoverNotFound,
            Self::AlreadyConfirmed(_) => ErrorCode::HandoverAlreadyConfirmed,
        }
    }
}

/// Append a transfer record and (under the default policy) move the
/// project's PIC to `to_pic` immediately.
///
/// The caller supplies the record id; the store owns id assignment.
///
/// # Errors
///
/// - [`HandoverError::NotCurrentPic`] when `from_pic` does not match the
///   project's current PIC.
/// - [`HandoverError::SelfHandover`] when `to_pic` already is the PIC.
pub fn initiate(
    project: &mut Project,
    record_id: String,
    from_pic: &str,
    to_pic: &str,
    now: DateTime<Utc>,
    policy: HandoverPolicy,
) -> Result<HandoverRecord, HandoverError> {
    if project.pic != from_pic {
        return Err(HandoverError::NotCurrentPic(from_pic.to_string()));
    }
    if from_pic == to_pic {
        return Err(HandoverError::SelfHandover(to_pic.to_string()));
    }

    let record = HandoverRecord {
        id: record_id,
        from_pic: from_pic.to_string(),
        to_pic: to_pic.to_string(),
        initiated_at: now,
        confirmed_at: None,
    };
    project.handovers.push(record.clone());

    if policy.require_confirmation {
        debug!(project = %project.id, to = to_pic, "handover pending confirmation");
    } else {
        project.pic = to_pic.to_string();
        info!(project = %project.id, from = from_pic, to = to_pic, "PIC transferred");
    }

    Ok(record)
}

/// Mark a pending record as confirmed by the incoming PIC.
///
/// Under [`HandoverPolicy::require_confirmation`] this is also the moment
/// the project's PIC field changes.
///
/// # Errors
///
/// - [`HandoverError::NotFound`] for an unknown record id.
/// - [`HandoverError::AlreadyConfirmed`] when confirmed twice.
pub fn confirm(
    project: &mut Project,
    record_id: &str,
    now: DateTime<Utc>,
    policy: HandoverPolicy,
) -> Result<HandoverRecord, HandoverError> {
    let record = project
        .handovers
        .iter_mut()
        .find(|record| record.id == record_id)
        .ok_or_else(|| HandoverError::NotFound(record_id.to_string()))?;

    if record.confirmed_at.is_some() {
        return Err(HandoverError::AlreadyConfirmed(record_id.to_string()));
    }

    record.confirmed_at = Some(now);
    let snapshot = record.clone();
    info!(project = %project.id, handover = record_id, "handover confirmed");

    if policy.require_confirmation {
        project.pic = snapshot.to_pic.clone();
    }

    Ok(snapshot)
}

/// Transfer history, most recent first.
#[must_use]
pub fn history(project: &Project) -> Vec<&HandoverRecord> {
    project.handovers.iter().rev().collect()
}
