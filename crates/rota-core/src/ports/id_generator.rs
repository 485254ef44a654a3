//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: Clock の時刻 + ランダム部（本番用）
//! - **SequentialIdGenerator**: カウンタベース（テスト・デモ用、決定的）

use std::sync::atomic::{AtomicU64, Ordering};

use ulid::Ulid;

use crate::domain::ids::{TaskId, UserId};
use crate::ports::Clock;

pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;

    fn generate_user_id(&self) -> UserId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使うので、FixedClock なら timestamp 部分が固定されます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        TaskId::from(self.next_ulid())
    }

    fn generate_user_id(&self) -> UserId {
        UserId::from(self.next_ulid())
    }
}

/// Counter-based ids: 1, 2, 3, ... in the random part, zero timestamp.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ulid(&self) -> Ulid {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Ulid::from_parts(0, u128::from(n))
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_task_id(&self) -> TaskId {
        TaskId::from(self.next_ulid())
    }

    fn generate_user_id(&self) -> UserId {
        UserId::from(self.next_ulid())
    }
}
