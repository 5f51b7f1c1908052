use serde::{Deserialize, Serialize};

/// Incident row supplied to the assistant as ground truth. Not the same shape
/// as the chat incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantIncident {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantQueryRequest {
    pub question: String,
    #[serde(default)]
    pub incidents: Option<Vec<AssistantIncident>>,
}

impl AssistantQueryRequest {
    /// Absent and null incident lists both read as empty.
    pub fn incidents(&self) -> &[AssistantIncident] {
        self.incidents.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantQueryResponse {
    pub reply: String,
}
