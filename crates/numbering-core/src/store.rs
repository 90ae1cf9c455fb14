use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::CounterStoreError;

pub type Result<T> = std::result::Result<T, CounterStoreError>;

/// A shared key-value store with atomic integer counters.
///
/// The sequence generator relies on `incr` being atomic across every process
/// pointed at the same store. Nothing else in the service provides mutual
/// exclusion.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Atomically increments the counter at `key` by one and returns the new
    /// value. A missing key counts as 0.
    ///
    /// Returns `Ok(None)` if the store answered without a value.
    async fn incr(&self, key: &str) -> Result<Option<i64>>;

    /// Sets a time-to-live on an existing key.
    ///
    /// Returns `Ok(false)` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Reads the counter at `key` without modifying it.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<i64>>;
}

#[async_trait]
impl<S: CounterStore + ?Sized> CounterStore for Arc<S> {
    async fn incr(&self, key: &str) -> Result<Option<i64>> {
        (**self).incr(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        (**self).expire(key, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<i64>> {
        (**self).get(key).await
    }
}
