//! Commands accepted by the task store.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::DomainEvent;
use super::ids::TaskId;
use super::user::User;
use super::weekday::Weekday;

/// The five slot operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Claim,
    Complete,
    Approve,
    Reject,
    Release,
}

impl Action {
    pub fn verb(self) -> &'static str {
        match self {
            Action::Claim => "claim",
            Action::Complete => "complete",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Release => "release",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Claim {
        task: TaskId,
        day: Weekday,
        user: User,
    },
    Complete {
        task: TaskId,
        day: Weekday,
        photo: String,
    },
    Approve {
        task: TaskId,
        day: Weekday,
    },
    Reject {
        task: TaskId,
        day: Weekday,
        comment: String,
    },
    Release {
        task: TaskId,
        day: Weekday,
    },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Claim { .. } => Action::Claim,
            Command::Complete { .. } => Action::Complete,
            Command::Approve { .. } => Action::Approve,
            Command::Reject { .. } => Action::Reject,
            Command::Release { .. } => Action::Release,
        }
    }

    pub fn task_id(&self) -> TaskId {
        match self {
            Command::Claim { task, .. }
            | Command::Complete { task, .. }
            | Command::Approve { task, .. }
            | Command::Reject { task, .. }
            | Command::Release { task, .. } => *task,
        }
    }

    pub fn day(&self) -> Weekday {
        match self {
            Command::Claim { day, .. }
            | Command::Complete { day, .. }
            | Command::Approve { day, .. }
            | Command::Reject { day, .. }
            | Command::Release { day, .. } => *day,
        }
    }
}

/// Result of a command that changed the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Version of the snapshot the command produced.
    pub version: u64,
    pub event: DomainEvent,
}
