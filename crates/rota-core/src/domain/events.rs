//! Events - ドメインイベント
//!
//! 適用されたコマンドごとに 1 つ発生し、`EventSink` に送られます。
//! 拒否されたコマンドはイベントを生みません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::AssignmentStatus;
use super::ids::{TaskId, UserId};
use super::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    Claimed {
        task: TaskId,
        day: Weekday,
        claimant: UserId,
        claimant_name: String,
        at: DateTime<Utc>,
    },
    Completed {
        task: TaskId,
        day: Weekday,
        photo: String,
        at: DateTime<Utc>,
    },
    Approved {
        task: TaskId,
        day: Weekday,
        claimant: UserId,
        points: u32,
        at: DateTime<Utc>,
    },
    Rejected {
        task: TaskId,
        day: Weekday,
        claimant: UserId,
        comment: String,
    },
    Released {
        task: TaskId,
        day: Weekday,
        claimant: UserId,
        previous: AssignmentStatus,
    },
}

impl DomainEvent {
    pub fn task_id(&self) -> TaskId {
        match self {
            DomainEvent::Claimed { task, .. }
            | DomainEvent::Completed { task, .. }
            | DomainEvent::Approved { task, .. }
            | DomainEvent::Rejected { task, .. }
            | DomainEvent::Released { task, .. } => *task,
        }
    }

    pub fn day(&self) -> Weekday {
        match self {
            DomainEvent::Claimed { day, .. }
            | DomainEvent::Completed { day, .. }
            | DomainEvent::Approved { day, .. }
            | DomainEvent::Rejected { day, .. }
            | DomainEvent::Released { day, .. } => *day,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::Claimed { .. } => "claimed",
            DomainEvent::Completed { .. } => "completed",
            DomainEvent::Approved { .. } => "approved",
            DomainEvent::Rejected { .. } => "rejected",
            DomainEvent::Released { .. } => "released",
        }
    }
}
