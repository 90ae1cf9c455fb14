use async_trait::async_trait;
use jiff::Zoned;
use numbering_core::{Clock, CounterStore, CounterStoreError, SequenceError, Sequencer, SystemClock};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::key::{day_key, ttl_until_next_midnight, DEFAULT_KEY_PREFIX};

/// Largest sequence number issued for a single day.
pub const MAX_SEQUENCE_VALUE: u64 = 9_999_999_999;

/// Issues sequence numbers that restart every local day.
///
/// The generator keeps no state of its own. Each day maps to one counter key
/// (`seq:yyyyMMdd`) in the shared store, and every number comes from a single
/// atomic increment there. The store handle is shared; the generator never
/// opens or closes connections.
///
/// The first caller of the day (the one that sees 1) arms a TTL that ends the
/// key at the next local midnight. Increment and expiry are two separate
/// commands. If the expiry command fails, the key outlives its day. That is
/// harmless for correctness because the next day uses a new key.
pub struct SequenceGenerator<S: ?Sized, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    key_prefix: String,
}

impl<S: CounterStore + ?Sized> SequenceGenerator<S, SystemClock> {
    /// Creates a generator that reads the local date from the system clock.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CounterStore + ?Sized, C: Clock> SequenceGenerator<S, C> {
    pub fn with_clock(store: Arc<S>, clock: C) -> Self {
        Self {
            store,
            clock,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Replaces the `seq:` key prefix, e.g. to share one Redis between
    /// environments.
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// The counter key for the local date of `now`.
    pub fn key_for(&self, now: &Zoned) -> String {
        day_key(&self.key_prefix, now)
    }

    /// Sets the day key to expire at the next local midnight.
    ///
    /// Failures are logged and swallowed: the sequence value the caller is
    /// about to receive is already valid.
    async fn arm_expiry(&self, key: &str, now: &Zoned) {
        let ttl = match ttl_until_next_midnight(now) {
            Ok(ttl) => ttl,
            Err(e) => {
                warn!(key, error = %e, "Failed to compute time until next midnight; day key left without expiry");
                return;
            }
        };

        match self.store.expire(key, ttl).await {
            Ok(true) => debug!(key, ttl_secs = ttl.as_secs(), "Armed day key expiry"),
            Ok(false) => warn!(key, "Day key vanished before its expiry could be armed"),
            Err(e) => {
                warn!(key, error = %e, "Failed to arm day key expiry; key may outlive its day")
            }
        }
    }
}

/// Splits store failures into connectivity problems and bad data.
fn store_error(key: &str, error: CounterStoreError) -> SequenceError {
    match error {
        CounterStoreError::InvalidData(reason) => SequenceError::InvalidState {
            key: key.to_string(),
            reason,
        },
        source => SequenceError::StoreUnavailable {
            key: key.to_string(),
            source,
        },
    }
}

/// Checks an increment result against the valid sequence range.
fn validate(key: &str, value: i64) -> Result<u64, SequenceError> {
    let sequence = u64::try_from(value)
        .ok()
        .filter(|sequence| *sequence >= 1)
        .ok_or_else(|| SequenceError::InvalidState {
            key: key.to_string(),
            reason: format!("increment returned non-positive value {value}"),
        })?;

    if sequence > MAX_SEQUENCE_VALUE {
        return Err(SequenceError::CapacityExhausted {
            key: key.to_string(),
            value,
            max: MAX_SEQUENCE_VALUE,
        });
    }

    Ok(sequence)
}

#[async_trait]
impl<S: CounterStore + ?Sized, C: Clock + 'static> Sequencer for SequenceGenerator<S, C> {
    async fn next(&self) -> Result<u64, SequenceError> {
        let now = self.clock.now();
        let key = self.key_for(&now);

        let value = self
            .store
            .incr(&key)
            .await
            .map_err(|e| store_error(&key, e))?
            .ok_or_else(|| SequenceError::InvalidState {
                key: key.clone(),
                reason: "increment returned no value".to_string(),
            })?;

        // Only the caller that created the key arms its expiry.
        if value == 1 {
            self.arm_expiry(&key, &now).await;
        }

        let sequence = validate(&key, value)?;
        debug!(key = %key, sequence, "Generated sequence");
        Ok(sequence)
    }

    async fn current(&self) -> Result<u64, SequenceError> {
        let key = self.key_for(&self.clock.now());

        let value = self
            .store
            .get(&key)
            .await
            .map_err(|e| store_error(&key, e))?;

        match value {
            None => Ok(0),
            Some(value) => u64::try_from(value).map_err(|_| SequenceError::InvalidState {
                key,
                reason: format!("stored counter is negative: {value}"),
            }),
        }
    }
}
