//! Assignment state machine for a single (task, weekday) slot.
//!
//! State transitions:
//! - Taken -> PendingApproval -> Approved
//! - Taken -> PendingApproval -> Rejected -> PendingApproval (re-submit)
//!
//! `complete` is accepted from every state; `approve` / `reject` only from
//! `PendingApproval`. Removing the slot (`release`) is handled by the owning
//! [`Task`](super::task::Task), not here.
//!
//! Transitions never mutate: they return a new `Assignment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::command::Action;
use super::errors::CommandError;
use super::ids::UserId;
use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Claimed, no proof submitted yet.
    Taken,

    /// Proof submitted, waiting for an admin.
    PendingApproval,

    /// Accepted by an admin; counts towards the claimant's points.
    Approved,

    /// Sent back by an admin with a comment.
    Rejected,
}

impl AssignmentStatus {
    /// Is an admin expected to act on this slot?
    pub fn awaits_review(self) -> bool {
        matches!(self, AssignmentStatus::PendingApproval)
    }

    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Taken => "taken",
            AssignmentStatus::PendingApproval => "pending approval",
            AssignmentStatus::Approved => "approved",
            AssignmentStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Claim record for one weekday slot of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub claimant_id: UserId,
    pub claimant_name: String,
    pub status: AssignmentStatus,

    /// Opaque reference to the proof photo (URI, path, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    pub assigned_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_comment: Option<String>,
}

impl Assignment {
    /// A fresh claim in `Taken`.
    pub fn taken(claimant: &User, now: DateTime<Utc>) -> Self {
        Self {
            claimant_id: claimant.id,
            claimant_name: claimant.name.clone(),
            status: AssignmentStatus::Taken,
            photo: None,
            assigned_at: now,
            completed_at: None,
            approved_at: None,
            rejection_comment: None,
        }
    }

    /// Submit proof. Accepted from any state.
    ///
    /// Drops any previous approval timestamp. The last rejection comment stays
    /// until the next review.
    pub fn complete(&self, photo: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status: AssignmentStatus::PendingApproval,
            photo: Some(photo.into()),
            completed_at: Some(now),
            approved_at: None,
            ..self.clone()
        }
    }

    pub fn approve(&self, now: DateTime<Utc>) -> Result<Self, CommandError> {
        self.expect_review(Action::Approve)?;
        Ok(Self {
            status: AssignmentStatus::Approved,
            approved_at: Some(now),
            ..self.clone()
        })
    }

    /// Refuse the proof: stores the comment and clears the photo.
    pub fn reject(&self, comment: impl Into<String>) -> Result<Self, CommandError> {
        self.expect_review(Action::Reject)?;
        Ok(Self {
            status: AssignmentStatus::Rejected,
            photo: None,
            rejection_comment: Some(comment.into()),
            ..self.clone()
        })
    }

    fn expect_review(&self, action: Action) -> Result<(), CommandError> {
        if self.status.awaits_review() {
            Ok(())
        } else {
            Err(CommandError::InvalidStateForTransition {
                from: self.status,
                action,
            })
        }
    }
}
