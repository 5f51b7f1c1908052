//! Deterministic responders used when no provider is configured or a provider
//! call fails. Same input, same bytes out.

use crate::heuristics::{build_basic_summary, extract_tags, guess_severity};
use crate::incidents::models::{ChatIncident, ChatMessage, Role, SuggestResult};

pub const FALLBACK_STATUS: &str = "OPEN";
pub const FALLBACK_CONFIDENCE: f64 = 0.55;
pub const FALLBACK_TITLE: &str = "Incident: investigation started";

pub const FALLBACK_IMPACT: &str = "Preliminary heuristic assessment of the incident impact. \
    Further investigation is required to confirm scope and severity.";

pub const FALLBACK_ACTION_ITEMS: [&str; 3] = [
    "Check logs, metrics and alerts around the suspected incident time.",
    "Confirm which users, services or regions are affected.",
    "Review recent deployments or configuration changes.",
];

const CHAT_NEXT_STEPS: [&str; 3] = [
    "- Check logs and metrics around the time of the incident.",
    "- Verify recent deployments or configuration changes.",
    "- Communicate current status to stakeholders.",
];

/// Placeholder for an absent severity or status.
pub const UNKNOWN: &str = "UNKNOWN";

/// Content of the most recent user message, if it is non-empty.
fn last_user_question(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .filter(|content| !content.is_empty())
}

/// Multi-line reply restating the incident and, when the user asked something,
/// echoing the last question with a generic checklist.
pub fn basic_incident_chat_reply(incident: &ChatIncident, messages: &[ChatMessage]) -> String {
    let mut lines: Vec<String> = vec![
        format!(
            "I am the incident AI assistant for incident #{}.",
            incident.id
        ),
        String::new(),
        format!("Title: {}", incident.title),
        format!(
            "Severity: {} | Status: {}",
            incident.severity.as_deref().unwrap_or(UNKNOWN),
            incident.status.as_deref().unwrap_or(UNKNOWN)
        ),
    ];

    if let Some(description) = incident.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(format!("Description: {description}"));
    }

    if let Some(question) = last_user_question(messages) {
        lines.push(String::new());
        lines.push(format!("Last question: {question}"));
        lines.push(String::new());
        lines.push("Example next steps:".to_string());
        lines.extend(CHAT_NEXT_STEPS.iter().map(|s| s.to_string()));
    }

    lines.join("\n")
}

/// Heuristic [`SuggestResult`]. Also the default the normalizer backfills from.
pub fn basic_incident_suggest(title: &str, description: &str) -> SuggestResult {
    let text = format!("{title} {description}");
    let text = text.trim();

    let suggested_title = match title.trim() {
        "" => FALLBACK_TITLE.to_string(),
        t => t.to_string(),
    };

    SuggestResult {
        summary: build_basic_summary(title, description),
        suggested_title,
        impact_summary: FALLBACK_IMPACT.to_string(),
        action_items: FALLBACK_ACTION_ITEMS.iter().map(|s| s.to_string()).collect(),
        severity_proposed: guess_severity(text),
        status_proposed: FALLBACK_STATUS.to_string(),
        tags: extract_tags(text),
        confidence: FALLBACK_CONFIDENCE,
    }
}
