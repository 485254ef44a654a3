//! TaskStore port - タスク集合の正本（source of truth）
//!
//! # 設計原則
//! - コマンドは同期的に、集合全体の置き換えとして原子的に適用される
//! - 読み手は常に完全なスナップショット（`Arc<Board>`）を見る
//! - 拒否されたコマンドはスナップショットを公開しない
//!
//! 実装: `store::InMemoryTaskStore`

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Applied, Board, Command, CommandError, PendingApproval, PointsSummary};

/// Precondition evaluated against the board a command is about to change.
pub type Guard<'a> = &'a dyn Fn(&Board, &Command) -> Result<(), CommandError>;

pub trait TaskStore: Send + Sync {
    /// Apply one command atomically, after `guard` accepts it.
    ///
    /// The guard sees the same board the command is applied to; no other
    /// command can land in between.
    fn apply_checked(&self, command: Command, guard: Guard<'_>) -> Result<Applied, CommandError>;

    /// Apply one command atomically.
    fn apply(&self, command: Command) -> Result<Applied, CommandError> {
        self.apply_checked(command, &|_, _| Ok(()))
    }

    /// Current snapshot.
    fn snapshot(&self) -> Arc<Board>;

    /// Stream of snapshots; the receiver starts at the current one.
    fn subscribe(&self) -> watch::Receiver<Arc<Board>>;

    fn pending_approvals(&self) -> Vec<PendingApproval> {
        self.snapshot().pending_approvals()
    }

    fn points_by_user(&self) -> Vec<PointsSummary> {
        self.snapshot().points_by_user()
    }
}
