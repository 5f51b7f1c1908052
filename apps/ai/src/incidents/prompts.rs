// Prompt builders for the incident chat and suggest capabilities.

use crate::heuristics::truncate_with_ellipsis;
use crate::incidents::fallback::UNKNOWN;
use crate::incidents::models::{ChatIncident, ChatMessage, SUGGEST_KEYS};
use crate::llm_client::PromptMessage;

/// Similar incidents embedded in the chat prompt.
pub const MAX_SIMILAR_INCIDENTS: usize = 5;
const SIMILAR_DESCRIPTION_CHARS: usize = 180;

const CHAT_SYSTEM_PREAMBLE: &str = "\
You are an SRE / incident-management assistant embedded in an incident tool.
You DO have access to the current incident details below, and to a list called \
\"similar incidents\" that contains past incidents selected by the system.
Never say that you don't have access to the incident system or to past incidents.

If the user asks about similar past incidents:
- If the similar incidents list is non-empty, explicitly mention the most relevant ones
  and explain what can be learned from them (root cause, mitigation, severity, status).
- If the similar incidents list is empty, say clearly that there are no similar incidents
  in the provided list.

Always answer in English. Be concise and action-oriented: focus on diagnosis hints
and concrete next steps.
";

const SUGGEST_INSTRUCTIONS: &str = "\
You are an SRE assistant. Given an incident title and description, \
propose a better title, a short impact summary, and concrete next actions.

Return ONLY valid JSON with this exact structure (no markdown, no code fences, \
no text before or after the object):
";

/// Type hint and optional comment shown to the model for each key of [`SUGGEST_KEYS`].
fn schema_hint(key: &str) -> (&'static str, Option<&'static str>) {
    match key {
        "actionItems" | "tags" => ("[string, ...]", None),
        "severityProposed" => ("string", Some("SEV1..SEV5")),
        "confidence" => ("number", Some("0..1")),
        _ => ("string", None),
    }
}

fn render_schema() -> String {
    let last = SUGGEST_KEYS.len() - 1;
    let fields: Vec<String> = SUGGEST_KEYS
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let (kind, comment) = schema_hint(key);
            let comma = if i < last { "," } else { "" };
            match comment {
                Some(c) => format!("  \"{key}\": {kind}{comma}  // {c}"),
                None => format!("  \"{key}\": {kind}{comma}"),
            }
        })
        .collect();
    format!("{{\n{}\n}}", fields.join("\n"))
}

fn render_similar(similar: &[ChatIncident]) -> Vec<String> {
    let mut lines = Vec::new();
    for s in similar.iter().take(MAX_SIMILAR_INCIDENTS) {
        lines.push(format!(
            "- [{}] {} (status={}, severity={})",
            s.id,
            s.title,
            s.status.as_deref().unwrap_or(UNKNOWN),
            s.severity.as_deref().unwrap_or(UNKNOWN)
        ));
        let description = s.description.as_deref().unwrap_or("").trim();
        if !description.is_empty() {
            lines.push(format!(
                "  Description: {}",
                truncate_with_ellipsis(description, SIMILAR_DESCRIPTION_CHARS)
            ));
        }
    }
    lines
}

/// Provider input for one chat turn: the grounding system prompt plus the
/// caller's messages, in order, with roles mapped for the provider.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system: String,
    pub messages: Vec<PromptMessage>,
}

/// Builds the chat system prompt (access assertions, the current incident, up
/// to [`MAX_SIMILAR_INCIDENTS`] similar ones) and forwards `messages` after it.
pub fn build_incident_chat_prompt(
    incident: &ChatIncident,
    similar: &[ChatIncident],
    messages: &[ChatMessage],
) -> ChatPrompt {
    let mut system = String::from(CHAT_SYSTEM_PREAMBLE);
    system.push_str(&format!(
        "\nCurrent incident:\n- ID: {}\n- Title: {}\n- Status: {}\n- Severity: {}\n- Description: {}\n",
        incident.id,
        incident.title,
        incident.status.as_deref().unwrap_or(UNKNOWN),
        incident.severity.as_deref().unwrap_or(UNKNOWN),
        incident
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("-"),
    ));

    let similar_lines = render_similar(similar);
    if similar_lines.is_empty() {
        system.push_str("\nSimilar incidents: (none provided by the system)\n");
    } else {
        system.push_str("\nSimilar incidents:\n");
        system.push_str(&similar_lines.join("\n"));
    }

    ChatPrompt {
        system,
        messages: messages.iter().map(ChatMessage::to_prompt_message).collect(),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// User prompt demanding a bare JSON object with exactly the suggest keys.
pub fn build_incident_suggest_prompt(title: &str, description: &str) -> String {
    let mut prompt = String::from(SUGGEST_INSTRUCTIONS);
    prompt.push_str(&render_schema());
    prompt.push_str(&format!(
        "\n\nTitle: {}\nDescription: {}\n",
        or_dash(title),
        or_dash(description)
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidents::models::Role;
    use crate::llm_client::PromptRole;

    fn incident(id: &str, description: Option<&str>) -> ChatIncident {
        ChatIncident {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: description.map(str::to_string),
            severity: Some("SEV2".to_string()),
            status: Some("RESOLVED".to_string()),
        }
    }

    #[test]
    fn test_chat_prompt_embeds_current_incident() {
        let prompt = build_incident_chat_prompt(&incident("cur", Some("db pool exhausted")), &[], &[]).system;
        assert!(prompt.contains("- ID: cur"));
        assert!(prompt.contains("- Title: Title cur"));
        assert!(prompt.contains("- Status: RESOLVED"));
        assert!(prompt.contains("- Severity: SEV2"));
        assert!(prompt.contains("- Description: db pool exhausted"));
        assert!(prompt.contains("Never say that you don't have access"));
    }

    #[test]
    fn test_chat_prompt_states_when_no_similar_incidents() {
        let prompt = build_incident_chat_prompt(&incident("cur", None), &[], &[]).system;
        assert!(prompt.contains("Similar incidents: (none provided by the system)"));
        assert!(prompt.contains("- Description: -"));
    }

    #[test]
    fn test_chat_prompt_caps_similar_at_five() {
        let similar: Vec<ChatIncident> =
            (1..=7).map(|i| incident(&format!("s{i}"), None)).collect();
        let prompt = build_incident_chat_prompt(&incident("cur", None), &similar, &[]).system;
        assert!(prompt.contains("- [s1] Title s1 (status=RESOLVED, severity=SEV2)"));
        assert!(prompt.contains("[s5]"));
        assert!(!prompt.contains("[s6]"));
        assert!(!prompt.contains("[s7]"));
    }

    #[test]
    fn test_chat_prompt_truncates_similar_descriptions() {
        let long = "z".repeat(250);
        let similar = vec![incident("s1", Some(&long))];
        let prompt = build_incident_chat_prompt(&incident("cur", None), &similar, &[]).system;
        let expected = format!("  Description: {}…", "z".repeat(180));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"z".repeat(181)));
    }

    #[test]
    fn test_chat_prompt_forwards_messages_in_order_with_mapped_roles() {
        let messages = vec![
            ChatMessage { role: Role::User, content: "1".to_string() },
            ChatMessage { role: Role::Assistant, content: "2".to_string() },
            ChatMessage { role: Role::Other, content: "3".to_string() },
        ];
        let prompt = build_incident_chat_prompt(&incident("cur", None), &[], &messages);
        let roles: Vec<PromptRole> = prompt.messages.iter().map(|m| m.role).collect();
        let contents: Vec<&str> = prompt.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(roles, vec![PromptRole::User, PromptRole::Assistant, PromptRole::User]);
        assert_eq!(contents, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_suggest_prompt_lists_every_key() {
        let prompt = build_incident_suggest_prompt("Login broken", "");
        for key in SUGGEST_KEYS {
            assert!(prompt.contains(&format!("\"{key}\":")), "missing {key}");
        }
        assert!(prompt.contains("no markdown"));
        assert!(prompt.contains("Title: Login broken"));
        assert!(prompt.contains("Description: -"));
    }

    #[test]
    fn test_suggest_prompt_does_not_expand_placeholders_in_user_text() {
        let prompt = build_incident_suggest_prompt("{description}", "body");
        assert!(prompt.contains("Title: {description}"));
        assert!(prompt.contains("Description: body"));
    }

    #[test]
    fn test_suggest_schema_is_comma_separated_before_comments() {
        let prompt = build_incident_suggest_prompt("t", "d");
        assert!(prompt.contains("\"severityProposed\": string,  // SEV1..SEV5"));
        assert!(prompt.contains("\"confidence\": number  // 0..1"));
    }
}
