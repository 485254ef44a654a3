//! rota-core
//!
//! Core of a shared-household chore rota: a fixed catalog of chores, each
//! with a per-weekday claim slot that moves through
//! `Taken → PendingApproval → Approved | Rejected`.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, weekday, user, assignment, task, board, catalog, command, events, errors, policy）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, EventSink, TaskStore）
//! - **store**: TaskStore の実装（InMemoryTaskStore）
//! - **app**: アプリケーション層（AppBuilder, ChoreBoard）

pub mod app;
pub mod domain;
pub mod ports;
pub mod store;

pub use app::{App, AppBuilder, BuildError, ChoreBoard};
pub use domain::{
    Assignment, AssignmentStatus, Board, Catalog, Command, CommandError, DomainEvent, Role, Task,
    TaskId, User, UserId, Weekday,
};
