//! HTTP transport for the numbering service.
//!
//! A thin axum layer over [`numbering_guid::GuidGenerator`] and a
//! [`numbering_core::Sequencer`]: each route calls one generator operation
//! and serializes the result as `{"value": ...}`.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
