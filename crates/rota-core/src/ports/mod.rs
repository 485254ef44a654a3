//! Ports - 抽象化レイヤー
//!
//! 時刻・ID 生成・イベント出力・タスク集合の保管を trait として切り出し、
//! テストでは決定的な実装に差し替えられるようにしています。

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::{EventSink, NoopEventSink, RecordingEventSink, TracingEventSink};
pub use self::id_generator::{IdGenerator, SequentialIdGenerator, UlidGenerator};
pub use self::task_store::{Guard, TaskStore};
