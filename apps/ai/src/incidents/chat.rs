//! Incident chat orchestrator.

use tracing::info;

use crate::incidents::fallback::basic_incident_chat_reply;
use crate::incidents::models::IncidentChatRequest;
use crate::incidents::prompts::build_incident_chat_prompt;
use crate::llm_client::{try_complete, CompletionProvider};

const CAPABILITY: &str = "incident-chat";

/// Answers a chat turn about one incident.
///
/// With no provider the heuristic reply is returned directly. With a provider,
/// any failure or blank reply demotes this request to the same heuristic reply.
pub async fn incident_chat(
    llm: Option<&dyn CompletionProvider>,
    request: &IncidentChatRequest,
) -> String {
    let fallback = || basic_incident_chat_reply(&request.incident, &request.messages);

    let Some(llm) = llm else {
        return fallback();
    };

    info!(
        "[{CAPABILITY}] incident={} similar={} messages={}",
        request.incident.id,
        request.similar_incidents.len(),
        request.messages.len()
    );

    let prompt = build_incident_chat_prompt(
        &request.incident,
        &request.similar_incidents,
        &request.messages,
    );

    try_complete(llm, CAPABILITY, &prompt.system, &prompt.messages)
        .await
        .unwrap_or_else(fallback)
}
