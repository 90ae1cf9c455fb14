mod guid;
mod health;
mod sequence;

pub use guid::create_guid_handler;
pub use health::health_handler;
pub use sequence::{current_sequence_handler, next_sequence_handler};
