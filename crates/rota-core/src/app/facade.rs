//! ChoreBoard - 画面側から使う窓口
//!
//! コマンドはそのまま TaskStore に転送します。
//! 編集モードと週ラベルは状態機械とは無関係な UI 状態で、
//! それぞれ独立した watch チャネルで公開します。

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use tokio::sync::watch;

use crate::domain::{
    Applied, Board, Command, CommandError, PendingApproval, PointsSummary, Policy, TaskId, User,
    Weekday,
};
use crate::ports::{Clock, TaskStore};

pub struct ChoreBoard {
    store: Arc<dyn TaskStore>,
    edit_mode: watch::Sender<bool>,
    week_label: watch::Sender<String>,
}

impl ChoreBoard {
    /// Week label starts at the clock's current Monday to Sunday week.
    pub fn new(store: Arc<dyn TaskStore>, clock: &dyn Clock) -> Self {
        let label = week_label_for(clock.now().date_naive());
        Self {
            store,
            edit_mode: watch::Sender::new(false),
            week_label: watch::Sender::new(label),
        }
    }

    // ========================================
    // Commands
    // ========================================

    pub fn claim(&self, task: TaskId, day: Weekday, user: &User) -> Result<Applied, CommandError> {
        self.submit(Command::Claim {
            task,
            day,
            user: user.clone(),
        })
    }

    pub fn complete(
        &self,
        task: TaskId,
        day: Weekday,
        photo: impl Into<String>,
    ) -> Result<Applied, CommandError> {
        self.submit(Command::Complete {
            task,
            day,
            photo: photo.into(),
        })
    }

    pub fn approve(&self, task: TaskId, day: Weekday) -> Result<Applied, CommandError> {
        self.submit(Command::Approve { task, day })
    }

    pub fn reject(
        &self,
        task: TaskId,
        day: Weekday,
        comment: impl Into<String>,
    ) -> Result<Applied, CommandError> {
        self.submit(Command::Reject {
            task,
            day,
            comment: comment.into(),
        })
    }

    pub fn release(&self, task: TaskId, day: Weekday) -> Result<Applied, CommandError> {
        self.submit(Command::Release { task, day })
    }

    pub fn submit(&self, command: Command) -> Result<Applied, CommandError> {
        self.store.apply(command)
    }

    /// Like [`submit`](Self::submit), but checks the actor's role against
    /// the board the command lands on.
    pub fn submit_as(&self, actor: &User, command: Command) -> Result<Applied, CommandError> {
        self.store
            .apply_checked(command, &|board, command| Policy::authorize(actor, command, board))
    }

    // ========================================
    // Queries
    // ========================================

    pub fn snapshot(&self) -> Arc<Board> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Board>> {
        self.store.subscribe()
    }

    pub fn pending_approvals(&self) -> Vec<PendingApproval> {
        self.store.pending_approvals()
    }

    pub fn points_by_user(&self) -> Vec<PointsSummary> {
        self.store.points_by_user()
    }

    // ========================================
    // UI state
    // ========================================

    pub fn edit_mode(&self) -> bool {
        *self.edit_mode.borrow()
    }

    /// Flips edit mode and returns the new value.
    pub fn toggle_edit_mode(&self) -> bool {
        self.edit_mode.send_modify(|on| *on = !*on);
        self.edit_mode()
    }

    pub fn subscribe_edit_mode(&self) -> watch::Receiver<bool> {
        self.edit_mode.subscribe()
    }

    pub fn week_label(&self) -> String {
        self.week_label.borrow().clone()
    }

    pub fn set_week_label(&self, label: impl Into<String>) {
        self.week_label.send_replace(label.into());
    }

    pub fn subscribe_week_label(&self) -> watch::Receiver<String> {
        self.week_label.subscribe()
    }
}

/// `Week 06 Oct - 12 Oct` for any date from Mon 6 Oct to Sun 12 Oct.
pub fn week_label_for(date: NaiveDate) -> String {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);
    format!("Week {} - {}", monday.format("%d %b"), sunday.format("%d %b"))
}
