use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use numbering_core::store::{CounterStore, Result};
use numbering_core::CounterStoreError;
use std::time::Duration;

/// In-memory counter entry.
#[derive(Debug, Clone, Copy)]
struct Entry {
    value: i64,
    expire_at: Option<Timestamp>,
}

impl Entry {
    const FRESH: Entry = Entry {
        value: 0,
        expire_at: None,
    };

    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

/// In-memory implementation of [`CounterStore`] using DashMap.
///
/// Mirrors Redis semantics: an expired key behaves as absent, and INCR on an
/// absent key starts from 0 with no TTL. Each operation holds the shard lock
/// for its key, which makes `incr` atomic within this process. Counters are
/// not shared across processes, so this store only suits tests and
/// single-node deployments.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: DashMap<String, Entry>,
}

impl InMemoryCounterStore {
    /// Creates a new in-memory counter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time-to-live of `key`, like Redis `PTTL`.
    ///
    /// Returns `None` if the key is absent or has no expiry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Timestamp::now();
        let entry = self.counters.get(key)?;
        if entry.is_expired(now) {
            return None;
        }
        let remaining = entry.expire_at?.duration_since(now);
        Duration::try_from(remaining).ok()
    }

    /// Drops `key` if it has expired as of `now`.
    fn evict_if_expired(&self, key: &str, now: Timestamp) {
        self.counters.remove_if(key, |_, entry| entry.is_expired(now));
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<Option<i64>> {
        let now = Timestamp::now();
        let mut entry = self.counters.entry(key.to_owned()).or_insert(Entry::FRESH);

        // An expired key is gone as far as callers can tell; start over.
        if entry.is_expired(now) {
            *entry = Entry::FRESH;
        }

        entry.value = entry.value.checked_add(1).ok_or_else(|| {
            CounterStoreError::Operation(format!("increment would overflow for key '{key}'"))
        })?;
        Ok(Some(entry.value))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let now = Timestamp::now();
        self.evict_if_expired(key, now);

        let Some(mut entry) = self.counters.get_mut(key) else {
            return Ok(false);
        };

        let expire_at = SignedDuration::try_from(ttl)
            .and_then(|ttl| now.checked_add(ttl))
            .map_err(|e| CounterStoreError::Operation(format!("invalid ttl {ttl:?}: {e}")))?;
        entry.expire_at = Some(expire_at);
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>> {
        let now = Timestamp::now();
        self.evict_if_expired(key, now);

        Ok(self.counters.get(key).map(|entry| entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn incr_starts_from_zero() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.incr("seq:20260315").await.unwrap(), Some(1));
        assert_eq!(store.incr("seq:20260315").await.unwrap(), Some(2));
        assert_eq!(store.get("seq:20260315").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = InMemoryCounterStore::new();

        store.incr("seq:20260315").await.unwrap();
        store.incr("seq:20260315").await.unwrap();

        assert_eq!(store.incr("seq:20260316").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expire_nonexistent() {
        let store = InMemoryCounterStore::new();

        assert!(!store
            .expire("nope", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn expire_sets_ttl() {
        let store = InMemoryCounterStore::new();
        store.incr("k").await.unwrap();

        assert_eq!(store.ttl("k"), None);
        assert!(store.expire("k", Duration::from_secs(3600)).await.unwrap());

        let ttl = store.ttl("k").unwrap();
        assert!(ttl <= Duration::from_secs(3600));
        assert!(ttl > Duration::from_secs(3590));
    }

    #[tokio::test]
    async fn expired_key_reads_as_absent() {
        let store = InMemoryCounterStore::new();
        store.incr("k").await.unwrap();
        store.incr("k").await.unwrap();

        // a zero TTL expires the key immediately, as in Redis
        assert!(store.expire("k", Duration::ZERO).await.unwrap());

        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.ttl("k"), None);
    }

    #[tokio::test]
    async fn incr_on_expired_key_restarts_without_ttl() {
        let store = InMemoryCounterStore::new();
        store.incr("k").await.unwrap();
        store.expire("k", Duration::ZERO).await.unwrap();

        assert_eq!(store.incr("k").await.unwrap(), Some(1));
        assert_eq!(store.ttl("k"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_incr_never_double_issues() {
        let store = Arc::new(InMemoryCounterStore::new());
        let mut handles = vec![];

        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::with_capacity(50);
                for _ in 0..50 {
                    seen.push(store.incr("k").await.unwrap().unwrap());
                }
                seen
            }));
        }

        let mut values = HashSet::new();
        for handle in handles {
            values.extend(handle.await.unwrap());
        }

        assert_eq!(values.len(), 1000);
        assert_eq!(values.iter().min(), Some(&1));
        assert_eq!(values.iter().max(), Some(&1000));
        assert_eq!(store.get("k").await.unwrap(), Some(1000));
    }
}
