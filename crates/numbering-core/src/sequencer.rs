use async_trait::async_trait;

use crate::SequenceError;

/// Issues day-scoped sequence numbers.
///
/// The gateway holds an `Arc<dyn Sequencer>` so it does not care which
/// counter store backs the generator.
#[async_trait]
pub trait Sequencer: Send + Sync + 'static {
    /// Issues the next sequence number for the current day.
    async fn next(&self) -> Result<u64, SequenceError>;

    /// Returns the last issued sequence number for the current day, or 0.
    async fn current(&self) -> Result<u64, SequenceError>;
}
