use crate::error::Result;
use crate::model::ValueResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// Issues the next sequence number of the day.
pub async fn next_sequence_handler(State(state): State<AppState>) -> Result<Json<ValueResponse<u64>>> {
    let value = state.sequencer().next().await?;
    Ok(Json(ValueResponse::new(value)))
}

/// Reports the last issued sequence number of the day without issuing one.
pub async fn current_sequence_handler(
    State(state): State<AppState>,
) -> Result<Json<ValueResponse<u64>>> {
    let value = state.sequencer().current().await?;
    Ok(Json(ValueResponse::new(value)))
}
