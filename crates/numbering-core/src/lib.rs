//! Core types and traits for the numbering service.
//!
//! This crate provides the clock abstraction, the counter store contract and
//! the error types shared by the GUID generator, the sequence generator and
//! the HTTP gateway.

pub mod clock;
pub mod error;
pub mod sequencer;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CounterStoreError, SequenceError};
pub use sequencer::Sequencer;
pub use store::CounterStore;
