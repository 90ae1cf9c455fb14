use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jiff::Timestamp;
use numbering_core::SequenceError;
use numbering_guid::GuidError;
use thiserror::Error;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Guid(#[from] GuidError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Guid(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GUID_INVARIANT_VIOLATED"),
            AppError::Sequence(SequenceError::StoreUnavailable { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            AppError::Sequence(SequenceError::CapacityExhausted { .. }) => {
                (StatusCode::CONFLICT, "SEQUENCE_EXHAUSTED")
            }
            AppError::Sequence(SequenceError::InvalidState { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SEQUENCE_STATE_INVALID")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // connection details stay in the logs
        let message = match &self {
            AppError::Sequence(err) if err.is_store_unavailable() => {
                warn!(key = err.key(), error = %self, "counter store unavailable");
                "service temporarily unavailable".to_string()
            }
            AppError::Sequence(err) => {
                error!(key = err.key(), error = %self, code, "sequence request failed");
                self.to_string()
            }
            AppError::Guid(_) => {
                error!(error = %self, code, "guid request failed");
                self.to_string()
            }
        };

        let body = ErrorResponse {
            error: message,
            code,
            status: status.as_u16(),
            timestamp: Timestamp::now(),
        };
        (status, Json(body)).into_response()
    }
}
