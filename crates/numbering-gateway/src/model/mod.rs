mod error;
mod health;
mod value;

pub use error::ErrorResponse;
pub use health::HealthResponse;
pub use value::ValueResponse;
