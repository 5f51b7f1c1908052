//! Axum route handlers for the incident chat and suggest capabilities.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::incidents::chat::incident_chat;
use crate::incidents::models::{
    IncidentChatRequest, IncidentChatResponse, IncidentSuggestRequest, SuggestResult,
};
use crate::incidents::suggest::incident_suggest;
use crate::state::AppState;

/// POST /incident-chat
///
/// Replies to the latest chat turn about one incident.
pub async fn handle_incident_chat(
    State(state): State<AppState>,
    Json(request): Json<IncidentChatRequest>,
) -> Result<Json<IncidentChatResponse>, AppError> {
    if request.incident.id.trim().is_empty() {
        return Err(AppError::Validation("incident.id cannot be empty".to_string()));
    }

    let reply = incident_chat(state.completion(), &request).await;
    Ok(Json(IncidentChatResponse { reply }))
}

/// POST /incident-suggest (alias: POST /incidents/suggest)
///
/// Proposes summary, title, severity, tags and action items from free text.
pub async fn handle_incident_suggest(
    State(state): State<AppState>,
    Json(request): Json<IncidentSuggestRequest>,
) -> Result<Json<SuggestResult>, AppError> {
    let title = request.title.as_deref().unwrap_or_default();
    let description = request.description.as_deref().unwrap_or_default();

    let result = incident_suggest(state.completion(), title, description).await?;
    Ok(Json(result))
}
