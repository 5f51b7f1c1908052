//! Axum route handler for the global assistant.

use axum::{extract::State, Json};

use crate::assistant::models::{AssistantQueryRequest, AssistantQueryResponse};
use crate::assistant::query::assistant_query;
use crate::state::AppState;

/// POST /assistant-query (alias: POST /assistant/query)
pub async fn handle_assistant_query(
    State(state): State<AppState>,
    Json(request): Json<AssistantQueryRequest>,
) -> Json<AssistantQueryResponse> {
    let reply = assistant_query(state.completion(), &request).await;
    Json(AssistantQueryResponse { reply })
}
