//! Process-local GUID generation.
//!
//! A GUID is a fixed-width, 30-character string built from the local time,
//! a server identifier, the process id and a rolling counter. See [`Guid`]
//! for the layout.

pub mod error;
mod generator;
mod guid;

pub use error::GuidError;
pub use generator::{GuidGenerator, GuidSettings, DEFAULT_SERVER_ID};
pub use guid::{Guid, GUID_LENGTH};
