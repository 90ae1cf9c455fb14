use serde::Serialize;

/// Body of every successful generator response.
#[derive(Debug, Serialize)]
pub struct ValueResponse<T> {
    pub value: T,
}

impl<T> ValueResponse<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}
