//! The LPJ accountability report and its status machine.
//!
//! An LPJ ("Laporan Pertanggungjawaban") is the end-of-project financial and
//! activity report. Exactly one may exist per completed project. The status
//! edges here are pure validity rules; the role gates on top of them live in
//! [`crate::workflow`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// LPJ lifecycle states. `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LpjStatus {
    Draft,
    Submitted,
    Revision,
    Approved,
}

impl LpjStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Revision => "revision",
            Self::Approved => "approved",
        }
    }

    /// Returns `true` once the report can no longer change at all.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns `true` while the PIC may still edit report fields.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Revision)
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `draft -> submitted`
    /// - `revision -> submitted` (resubmit)
    /// - `submitted -> revision`
    /// - `submitted -> approved`
    ///
    /// `draft -> approved` is structurally impossible: every approval passes
    /// through `submitted`. No transition leaves `approved`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for any edge not listed above,
    /// including no-op transitions.
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (self, target),
            (Self::Draft | Self::Revision, Self::Submitted)
                | (Self::Submitted, Self::Revision | Self::Approved)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by LPJ lifecycle rules",
            })
        }
    }
}

/// Error returned when an LPJ status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: LpjStatus,
    pub to: LpjStatus,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid LPJ transition {} -> {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// Income/expense totals carried by the report, in integer minor units
/// (e.g. cents or rupiah). Frozen once the report is approved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub final_balance: i64,
}

impl FinancialSummary {
    /// Build a summary with `final_balance` derived from income and expense.
    #[must_use]
    pub const fn balanced(total_income: i64, total_expense: i64) -> Self {
        Self {
            total_income,
            total_expense,
            final_balance: total_income - total_expense,
        }
    }
}

/// The accountability report attached to a completed project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lpj {
    pub id: String,
    pub status: LpjStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub financial_summary: FinancialSummary,
    /// Reviewer notes from each revision request, oldest first.
    #[serde(default)]
    pub revision_notes: Vec<String>,
    pub submitted_at: Option<NaiveDate>,
    pub approved_at: Option<NaiveDate>,
}

impl Lpj {
    /// A fresh draft report with empty fields.
    #[must_use]
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: LpjStatus::Draft,
            notes: String::new(),
            attachments: Vec::new(),
            financial_summary: FinancialSummary::default(),
            revision_notes: Vec::new(),
            submitted_at: None,
            approved_at: None,
        }
    }
}

impl fmt::Display for LpjStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LpjStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "revision" => Ok(Self::Revision),
            "approved" => Ok(Self::Approved),
            _ => Err(ParseEnumError {
                expected: "lpj status",
                got: s.to_string(),
            }),
        }
    }
}
