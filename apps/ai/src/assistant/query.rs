//! Assistant query orchestrator.

use tracing::info;

use crate::assistant::fallback::assistant_fallback_reply;
use crate::assistant::models::AssistantQueryRequest;
use crate::assistant::prompts::{build_assistant_query_system_prompt, build_incidents_context};
use crate::llm_client::{try_complete, CompletionProvider, PromptMessage};

const CAPABILITY: &str = "assistant-query";

/// Answers a free-form question, grounded on the supplied incident list.
pub async fn assistant_query(
    llm: Option<&dyn CompletionProvider>,
    request: &AssistantQueryRequest,
) -> String {
    let incidents = request.incidents();

    if let Some(llm) = llm {
        info!("[{CAPABILITY}] question with {} incidents", incidents.len());

        let context = build_incidents_context(incidents);
        let system = build_assistant_query_system_prompt(&context);
        let messages = [PromptMessage::user(request.question.clone())];

        if let Some(reply) = try_complete(llm, CAPABILITY, &system, &messages).await {
            return reply;
        }
    }

    assistant_fallback_reply(&request.question, incidents)
}
