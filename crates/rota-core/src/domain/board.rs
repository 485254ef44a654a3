//! Board snapshot: the whole task collection at one version.
//!
//! Design:
//! - A `Board` is immutable once built. `apply` returns a new board.
//! - Tasks are shared through `Arc`, so a command copies only the task it
//!   touches; every other task is shared with the previous snapshot.
//! - `version` increases by one per applied command.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::assignment::{Assignment, AssignmentStatus};
use super::command::Command;
use super::errors::CommandError;
use super::events::DomainEvent;
use super::ids::{TaskId, UserId};
use super::task::Task;
use super::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub version: u64,
    tasks: Vec<Arc<Task>>,
}

/// One slot waiting for an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingApproval {
    pub task: Arc<Task>,
    pub day: Weekday,
    pub assignment: Assignment,
}

/// Per-user totals over the current board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsSummary {
    pub user_id: UserId,
    pub user_name: String,
    /// Sum of task points over approved slots (saturating).
    pub points: u64,
    pub approved: usize,
    pub pending: usize,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            version: 0,
            tasks: tasks.into_iter().map(Arc::new).collect(),
        }
    }

    /// Tasks in catalog order.
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a task by name, ignoring case.
    pub fn task_by_name(&self, name: &str) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Apply one command. On success returns the next board and the event
    /// describing the change; on failure `self` is the unchanged snapshot.
    pub fn apply(
        &self,
        command: &Command,
        now: DateTime<Utc>,
    ) -> Result<(Board, DomainEvent), CommandError> {
        let task_id = command.task_id();
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(CommandError::TaskNotFound(task_id))?;
        let task = &self.tasks[index];

        let (updated, event) = match command {
            Command::Claim { day, user, .. } => {
                let next = task.claim(*day, user, now)?;
                let event = DomainEvent::Claimed {
                    task: task_id,
                    day: *day,
                    claimant: user.id,
                    claimant_name: user.name.clone(),
                    at: now,
                };
                (next, event)
            }
            Command::Complete { day, photo, .. } => {
                let next = task.complete(*day, photo.clone(), now)?;
                let event = DomainEvent::Completed {
                    task: task_id,
                    day: *day,
                    photo: photo.clone(),
                    at: now,
                };
                (next, event)
            }
            Command::Approve { day, .. } => {
                let claimant = claimant_at(task, *day)?;
                let next = task.approve(*day, now)?;
                let event = DomainEvent::Approved {
                    task: task_id,
                    day: *day,
                    claimant,
                    points: next.points,
                    at: now,
                };
                (next, event)
            }
            Command::Reject { day, comment, .. } => {
                let claimant = claimant_at(task, *day)?;
                let next = task.reject(*day, comment.clone())?;
                let event = DomainEvent::Rejected {
                    task: task_id,
                    day: *day,
                    claimant,
                    comment: comment.clone(),
                };
                (next, event)
            }
            Command::Release { day, .. } => {
                let (next, removed) = task.release(*day)?;
                let event = DomainEvent::Released {
                    task: task_id,
                    day: *day,
                    claimant: removed.claimant_id,
                    previous: removed.status,
                };
                (next, event)
            }
        };

        let mut tasks = self.tasks.clone();
        tasks[index] = Arc::new(updated);
        Ok((
            Board {
                version: self.version + 1,
                tasks,
            },
            event,
        ))
    }

    /// Every slot in `PendingApproval`, task catalog order then weekday order.
    pub fn pending_approvals(&self) -> Vec<PendingApproval> {
        self.tasks
            .iter()
            .flat_map(|task| {
                task.assignments
                    .iter()
                    .filter(|(_, a)| a.status.awaits_review())
                    .map(move |(day, a)| PendingApproval {
                        task: Arc::clone(task),
                        day: *day,
                        assignment: a.clone(),
                    })
            })
            .collect()
    }

    /// Points per claimant, highest first (ties by name).
    pub fn points_by_user(&self) -> Vec<PointsSummary> {
        let mut by_user: HashMap<UserId, PointsSummary> = HashMap::new();
        for task in &self.tasks {
            for assignment in task.assignments.values() {
                let entry = by_user
                    .entry(assignment.claimant_id)
                    .or_insert_with(|| PointsSummary {
                        user_id: assignment.claimant_id,
                        user_name: assignment.claimant_name.clone(),
                        points: 0,
                        approved: 0,
                        pending: 0,
                    });
                match assignment.status {
                    AssignmentStatus::Approved => {
                        entry.points = entry.points.saturating_add(u64::from(task.points));
                        entry.approved += 1;
                    }
                    AssignmentStatus::PendingApproval => entry.pending += 1,
                    AssignmentStatus::Taken | AssignmentStatus::Rejected => {}
                }
            }
        }
        let mut summaries: Vec<_> = by_user.into_values().collect();
        summaries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.user_name.cmp(&b.user_name))
        });
        summaries
    }
}

fn claimant_at(task: &Task, day: Weekday) -> Result<UserId, CommandError> {
    task.assignment(day)
        .map(|a| a.claimant_id)
        .ok_or(CommandError::SlotNotFound { task: task.id, day })
}
