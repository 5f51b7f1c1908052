pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::incidents::handlers as incidents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/incident-chat", post(incidents::handle_incident_chat))
        .route("/incident-suggest", post(incidents::handle_incident_suggest))
        .route("/incidents/suggest", post(incidents::handle_incident_suggest))
        .route("/assistant-query", post(assistant::handle_assistant_query))
        .route("/assistant/query", post(assistant::handle_assistant_query))
        .with_state(state)
}
