use crate::assistant::models::AssistantIncident;
use crate::assistant::prompts::build_incidents_context;

/// Deterministic assistant reply: echoes the question and either states that
/// there is no incident history or lists every incident supplied.
pub fn assistant_fallback_reply(question: &str, incidents: &[AssistantIncident]) -> String {
    if incidents.is_empty() {
        return format!(
            "You asked: {question}\n\n\
             I don't have any incident history yet, but I can still answer general questions."
        );
    }
    format!(
        "You asked: {question}\n\n\
         The language model is currently unavailable, but here is a quick summary of the incidents:\n\n{}",
        build_incidents_context(incidents)
    )
}
