use crate::error::Result;
use crate::model::ValueResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use numbering_guid::Guid;

pub async fn create_guid_handler(State(state): State<AppState>) -> Result<Json<ValueResponse<Guid>>> {
    let guid = state.guid().generate()?;
    Ok(Json(ValueResponse::new(guid)))
}
