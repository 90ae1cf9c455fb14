//! Day-scoped sequence numbers backed by a shared counter store.
//!
//! [`SequenceGenerator`] derives one counter key per local calendar day and
//! leans on the store's atomic increment for uniqueness across processes.
//! The store sits behind [`numbering_core::CounterStore`]; this crate ships
//! a Redis implementation and an in-memory one.

pub mod generator;
pub mod key;
pub mod store;

pub use generator::{SequenceGenerator, MAX_SEQUENCE_VALUE};
pub use key::{day_key, ttl_until_next_midnight, DEFAULT_KEY_PREFIX};
pub use store::{InMemoryCounterStore, RedisCounterStore};
