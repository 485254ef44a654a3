//! Store - TaskStore の実装
//!
//! 現在はメモリ上の実装のみ。永続化はしません。

pub mod memory;

pub use self::memory::InMemoryTaskStore;
