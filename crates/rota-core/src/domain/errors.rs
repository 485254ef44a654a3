//! Errors - コマンドが拒否された理由
//!
//! 前提条件を満たさないコマンドはスナップショットを変更せず、
//! 理由付きの `CommandError` を返します（黙って無視しない）。

use super::assignment::AssignmentStatus;
use super::command::Action;
use super::ids::TaskId;
use super::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("{day} slot of {task} is already taken by {claimant}")]
    SlotOccupied {
        task: TaskId,
        day: Weekday,
        claimant: String,
    },

    #[error("{task} is full ({capacity} of {capacity} slots taken)")]
    CapacityExceeded { task: TaskId, capacity: u8 },

    #[error("no assignment on {day} for {task}")]
    SlotNotFound { task: TaskId, day: Weekday },

    #[error("cannot {action} an assignment that is {from}")]
    InvalidStateForTransition {
        from: AssignmentStatus,
        action: Action,
    },

    #[error("{actor} is not allowed to {action}: {reason}")]
    NotPermitted {
        actor: String,
        action: Action,
        reason: &'static str,
    },
}

impl CommandError {
    /// Stable machine-readable tag, e.g. for presentation layers or logs.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::TaskNotFound(_) => "task_not_found",
            CommandError::SlotOccupied { .. } => "slot_occupied",
            CommandError::CapacityExceeded { .. } => "capacity_exceeded",
            CommandError::SlotNotFound { .. } => "slot_not_found",
            CommandError::InvalidStateForTransition { .. } => "invalid_state_for_transition",
            CommandError::NotPermitted { .. } => "not_permitted",
        }
    }
}
