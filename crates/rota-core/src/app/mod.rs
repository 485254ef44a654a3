//! App - アプリケーション層
//!
//! ports と store を組み合わせて、画面側が使う窓口を提供します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **ChoreBoard**: コマンド転送・スナップショット購読・UI 状態

pub mod builder;
pub mod facade;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::facade::{ChoreBoard, week_label_for};
