//! [`CounterStore`](numbering_core::CounterStore) implementations.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryCounterStore;
pub use self::redis::RedisCounterStore;
