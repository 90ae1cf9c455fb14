use thiserror::Error;

/// Errors returned by GUID generation and parsing.
///
/// Generation never fails because of an external system. Every variant here
/// means the generator produced, or was handed, something that does not fit
/// the fixed GUID layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuidError {
    #[error("guid {guid:?} has length {actual}; expected {expected}")]
    InvalidLength {
        guid: String,
        actual: usize,
        expected: usize,
    },
    #[error("guid {guid:?} is malformed: {reason}")]
    Malformed { guid: String, reason: String },
}
