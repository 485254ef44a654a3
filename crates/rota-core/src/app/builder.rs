//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: カタログの不備は build() で検出
//! - グローバルなシングルトンは持たない（App が唯一の所有者）

use std::sync::Arc;

use crate::app::facade::ChoreBoard;
use crate::domain::{Catalog, CatalogError, Role, User};
use crate::ports::{Clock, EventSink, IdGenerator, NoopEventSink, SystemClock, UlidGenerator};
use crate::store::InMemoryTaskStore;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .catalog(Catalog::from_json(&json)?)
///     .event_sink(Arc::new(TracingEventSink))
///     .build()?;
/// ```
///
/// 未設定のポートは SystemClock / UlidGenerator / NoopEventSink、
/// カタログは家庭用のデフォルトになります。
pub struct AppBuilder {
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    event_sink: Option<Arc<dyn EventSink>>,
    catalog: Catalog,
    week_label: Option<String>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            clock: None,
            ids: None,
            event_sink: None,
            catalog: Catalog::household_default(),
            week_label: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// 週ラベルを固定する（未設定なら Clock の週から計算）
    pub fn week_label(mut self, label: impl Into<String>) -> Self {
        self.week_label = Some(label.into());
        self
    }

    /// カタログを検証し、タスクを採番してストアと窓口を組み立てる
    ///
    /// # 検証
    /// - カタログが空でない
    /// - 名前が空白でなく、大文字小文字を無視して一意
    /// - 定員が 1..=7
    pub fn build(self) -> Result<App, BuildError> {
        self.catalog.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));
        let sink = self.event_sink.unwrap_or_else(|| Arc::new(NoopEventSink));

        let tasks = self.catalog.seed(|| ids.generate_task_id());
        let task_count = tasks.len();
        let store = InMemoryTaskStore::new(tasks, clock.clone(), sink);

        let board = ChoreBoard::new(Arc::new(store), clock.as_ref());
        if let Some(label) = self.week_label {
            board.set_week_label(label);
        }

        tracing::info!(tasks = task_count, week = %board.week_label(), "chore board ready");
        Ok(App { board, ids, clock })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はアプリケーションのランタイム
pub struct App {
    pub board: ChoreBoard,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl App {
    /// 新しい ID で利用者を作る（認証は外部の責務）
    pub fn user(&self, name: impl Into<String>, role: Role) -> User {
        User::new(self.ids.generate_user_id(), name, role)
    }
}
