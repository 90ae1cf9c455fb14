use thiserror::Error;

/// Errors reported by a [`CounterStore`](crate::CounterStore) backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CounterStoreError {
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
    #[error("counter store operation timed out: {0}")]
    Timeout(String),
    #[error("counter store value is invalid: {0}")]
    InvalidData(String),
    #[error("counter store operation failed: {0}")]
    Operation(String),
}

/// Errors returned by sequence generation.
///
/// The variants are deliberately coarse: transports map each one to a
/// different response, and operators need to tell a connectivity problem
/// apart from a capacity problem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// The counter store could not be reached or did not answer in time.
    #[error("counter store unavailable for key {key}: {source}")]
    StoreUnavailable {
        key: String,
        #[source]
        source: CounterStoreError,
    },
    /// The day's sequence space is used up.
    #[error("sequence exceeded maximum value for key {key}: {value} (max: {max})")]
    CapacityExhausted { key: String, value: i64, max: u64 },
    /// The store answered with something that cannot be a sequence value.
    #[error("sequence state invalid for key {key}: {reason}")]
    InvalidState { key: String, reason: String },
}

impl SequenceError {
    /// Whether the failure came from reaching the counter store.
    ///
    /// Only these failures can succeed on a caller-side retry within the
    /// same day.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, SequenceError::StoreUnavailable { .. })
    }

    /// The day key the failing operation was working on.
    pub fn key(&self) -> &str {
        match self {
            SequenceError::StoreUnavailable { key, .. }
            | SequenceError::CapacityExhausted { key, .. }
            | SequenceError::InvalidState { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_unavailable_is_distinguishable() {
        let unavailable = SequenceError::StoreUnavailable {
            key: "seq:20260315".to_string(),
            source: CounterStoreError::Unavailable("connection refused".to_string()),
        };
        let exhausted = SequenceError::CapacityExhausted {
            key: "seq:20260315".to_string(),
            value: 10_000_000_000,
            max: 9_999_999_999,
        };

        assert!(unavailable.is_store_unavailable());
        assert!(!exhausted.is_store_unavailable());
        assert_eq!(unavailable.key(), "seq:20260315");
        assert!(exhausted.to_string().contains("exceeded maximum value"));
    }
}
