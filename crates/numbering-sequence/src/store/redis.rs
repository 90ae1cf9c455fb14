use async_trait::async_trait;
use numbering_core::store::{CounterStore, Result};
use numbering_core::CounterStoreError;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A Redis-based implementation of [`CounterStore`].
///
/// Counters are plain Redis integers driven by `INCR`, `EXPIRE` and `GET`.
/// Redis executes each command atomically, which is what makes sequence
/// numbers unique across every process sharing the server.
///
/// Each command can be bounded by a timeout. There is no retry: a command
/// that fails or times out is reported to the caller.
#[derive(Debug, Clone)]
pub struct RedisCounterStore {
    conn: redis::aio::MultiplexedConnection,
    timeout: Option<Duration>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CounterStoreError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        CounterStoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        CounterStoreError::Unavailable(message)
    } else if lowered.contains("wrongtype")
        || lowered.contains("not an integer")
        || lowered.contains("incompatible")
    {
        CounterStoreError::InvalidData(message)
    } else {
        CounterStoreError::Operation(message)
    }
}

/// Redis `EXPIRE` takes whole seconds. Round up so the key never expires
/// before the requested instant.
fn ttl_seconds(ttl: Duration) -> i64 {
    let seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    i64::try_from(seconds.max(1)).unwrap_or(i64::MAX)
}

impl RedisCounterStore {
    /// Creates a new Redis counter store that gives up on any command after
    /// `timeout`.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `timeout` - Upper bound for a single command round trip
    pub fn with_timeout(conn: redis::aio::MultiplexedConnection, timeout: Duration) -> Self {
        Self {
            conn,
            timeout: Some(timeout),
        }
    }

    /// Opens a multiplexed connection to `url` and wraps it.
    ///
    /// The timeout, if any, also bounds the initial connection attempt.
    pub async fn connect(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("invalid Redis connection url", e))?;

        let connecting = client.get_multiplexed_async_connection();
        let conn = match timeout {
            Some(limit) => tokio::time::timeout(limit, connecting)
                .await
                .map_err(|_| {
                    CounterStoreError::Timeout(format!(
                        "failed to connect to Redis: no answer within {limit:?}"
                    ))
                })?,
            None => connecting.await,
        }
        .map_err(|e| map_redis_error("failed to connect to Redis", e))?;

        debug!(url, "Connected to Redis counter store");
        Ok(Self { conn, timeout })
    }

    /// Runs one Redis command under the configured timeout.
    async fn run<T>(
        &self,
        operation: &'static str,
        command: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T> {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command).await.map_err(|_| {
                CounterStoreError::Timeout(format!("{operation}: no reply within {limit:?}"))
            })?,
            None => command.await,
        };
        result.map_err(|e| map_redis_error(operation, e))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str) -> Result<Option<i64>> {
        trace!(key, "Incrementing counter in Redis");

        let mut conn = self.conn.clone();
        let command = conn.incr::<_, _, Option<i64>>(key, 1);
        match self.run("failed to increment counter in Redis", command).await {
            Ok(value) => {
                debug!(key, ?value, "Incremented counter in Redis");
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on incr");
                Err(e)
            }
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let seconds = ttl_seconds(ttl);
        trace!(key, seconds, "Setting counter expiry in Redis");

        let mut conn = self.conn.clone();
        let command = conn.expire::<_, bool>(key, seconds);
        match self.run("failed to set counter expiry in Redis", command).await {
            Ok(armed) => {
                debug!(key, seconds, armed, "Set counter expiry in Redis");
                Ok(armed)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on expire");
                Err(e)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<i64>> {
        trace!(key, "Fetching counter from Redis");

        let mut conn = self.conn.clone();
        let command = conn.get::<_, Option<i64>>(key);
        match self.run("failed to fetch counter from Redis", command).await {
            Ok(value) => {
                trace!(key, ?value, "Fetched counter from Redis");
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on get");
                Err(e)
            }
        }
    }
}
