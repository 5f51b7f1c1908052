// Prompt builders for the global assistant.

use crate::assistant::models::AssistantIncident;

const CONTEXT_HEADER: &str = "Here is the list of recent incidents. \
    This list is the ONLY source of truth about incidents.";
const CONTEXT_FORMAT: &str = "Format: id | title | severity | status | createdAt";

const ASSISTANT_SYSTEM: &str = "\
You are a helpful AI assistant embedded in an incident management product.
The system gives you a list of incidents (id, title, severity, status, createdAt).
THIS LIST IS THE GROUND TRUTH about incidents.

When the user asks questions about incidents (for example:
'Which SEV1 incidents happened this week?', 'How many SEV2 incidents last month?',
etc.), you MUST answer ONLY using this list. Do not invent incidents, titles,
severities or dates. If the information is not present or is ambiguous, clearly say
that you don't know based on the available data.

If the question is not about incidents at all (small talk, coding, etc.), you can
answer normally, but still do not invent new incidents.
Always answer in the same language as the user.";

/// Renders every incident as one line under a ground-truth header.
/// Returns an empty string for an empty list, meaning no grounding is available.
pub fn build_incidents_context(incidents: &[AssistantIncident]) -> String {
    if incidents.is_empty() {
        return String::new();
    }

    let mut lines = vec![CONTEXT_HEADER.to_string(), CONTEXT_FORMAT.to_string()];
    lines.extend(incidents.iter().map(|inc| {
        format!(
            "- {} | {} | severity={} | status={} | createdAt={}",
            inc.id,
            inc.title,
            inc.severity.as_deref().unwrap_or("UNKNOWN"),
            inc.status.as_deref().unwrap_or("UNKNOWN"),
            inc.created_at.as_deref().unwrap_or("-"),
        )
    }));
    lines.join("\n")
}

/// System prompt for the assistant; the incidents block is appended only when non-empty.
pub fn build_assistant_query_system_prompt(incidents_context: &str) -> String {
    if incidents_context.is_empty() {
        return ASSISTANT_SYSTEM.to_string();
    }
    format!("{ASSISTANT_SYSTEM}\n\nIncident list:\n{incidents_context}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str) -> AssistantIncident {
        AssistantIncident {
            id: id.to_string(),
            title: format!("Incident {id}"),
            description: None,
            status: Some("RESOLVED".to_string()),
            severity: Some("SEV1".to_string()),
            created_at: Some("2024-06-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_empty_list_renders_empty_context() {
        assert_eq!(build_incidents_context(&[]), "");
    }

    #[test]
    fn test_context_renders_fields_in_order() {
        let ctx = build_incidents_context(&[incident("a1")]);
        let lines: Vec<&str> = ctx.lines().collect();
        assert_eq!(lines[0], CONTEXT_HEADER);
        assert_eq!(lines[1], CONTEXT_FORMAT);
        assert_eq!(
            lines[2],
            "- a1 | Incident a1 | severity=SEV1 | status=RESOLVED | createdAt=2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_context_placeholders_for_missing_fields() {
        let bare = AssistantIncident {
            id: "b".to_string(),
            title: "Bare".to_string(),
            description: None,
            status: None,
            severity: None,
            created_at: None,
        };
        let ctx = build_incidents_context(&[bare]);
        assert!(ctx.ends_with("- b | Bare | severity=UNKNOWN | status=UNKNOWN | createdAt=-"));
    }

    #[test]
    fn test_context_enumerates_every_incident() {
        let incidents: Vec<AssistantIncident> =
            (0..60).map(|i| incident(&format!("id-{i}"))).collect();
        let ctx = build_incidents_context(&incidents);
        assert_eq!(ctx.lines().count(), 62);
        for inc in &incidents {
            assert!(ctx.contains(&format!("- {} |", inc.id)));
        }
    }

    #[test]
    fn test_system_prompt_appends_context_only_when_present() {
        let bare = build_assistant_query_system_prompt("");
        assert!(!bare.contains("Incident list:"));
        assert!(bare.contains("same language as the user"));

        let ctx = build_incidents_context(&[incident("x")]);
        let grounded = build_assistant_query_system_prompt(&ctx);
        assert!(grounded.contains("Incident list:\nHere is the list"));
        assert!(grounded.ends_with(&ctx));
    }
}
