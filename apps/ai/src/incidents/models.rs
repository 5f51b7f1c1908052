use serde::{Deserialize, Serialize};

use crate::heuristics::Severity;
use crate::llm_client::PromptMessage;

/// Incident as supplied to the chat capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatIncident {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Any other role string. Forwarded to the provider as `user`.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn to_prompt_message(&self) -> PromptMessage {
        match self.role {
            Role::Assistant => PromptMessage::assistant(self.content.clone()),
            Role::User | Role::Other => PromptMessage::user(self.content.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentChatRequest {
    pub incident: ChatIncident,
    #[serde(default)]
    pub similar_incidents: Vec<ChatIncident>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentChatResponse {
    pub reply: String,
}

/// Null and missing both mean empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentSuggestRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Structured proposal for a new incident. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResult {
    pub summary: String,
    pub suggested_title: String,
    pub impact_summary: String,
    pub action_items: Vec<String>,
    pub severity_proposed: Severity,
    pub status_proposed: String,
    pub tags: Vec<String>,
    pub confidence: f64,
}

/// Wire keys of [`SuggestResult`], in prompt order.
pub const SUGGEST_KEYS: [&str; 8] = [
    "summary",
    "suggestedTitle",
    "impactSummary",
    "actionItems",
    "severityProposed",
    "statusProposed",
    "tags",
    "confidence",
];
