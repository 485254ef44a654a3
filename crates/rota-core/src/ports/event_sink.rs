//! EventSink port - イベント記録の抽象化
//!
//! - **NoopEventSink**: 何もしない（デフォルト）
//! - **TracingEventSink**: tracing にイベントを流す
//! - **RecordingEventSink**: メモリに貯める（テスト・履歴表示用）

use std::sync::Mutex;

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを記録
///
/// 呼び出しはコマンド適用の直後、同じスレッドで行われます。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DomainEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &DomainEvent) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DomainEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(
                target: "rota::events",
                kind = event.kind(),
                task = %event.task_id(),
                day = %event.day(),
                event = %json,
                "domain event"
            ),
            Err(err) => tracing::warn!(target: "rota::events", error = %err, "failed to encode event"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &DomainEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Fan out to several sinks in order.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&self, event: &DomainEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: &DomainEvent) {
        (**self).emit(event);
    }
}
