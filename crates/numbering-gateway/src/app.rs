use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_guid_handler, current_sequence_handler, health_handler, next_sequence_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/guid", post(create_guid_handler))
            .route(
                "/sequence",
                post(next_sequence_handler).get(current_sequence_handler),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
