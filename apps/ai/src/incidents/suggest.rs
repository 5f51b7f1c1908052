//! Incident suggest orchestrator.

use crate::incidents::fallback::basic_incident_suggest;
use crate::incidents::models::SuggestResult;
use crate::incidents::normalizer::{normalize_suggest, NormalizeError};
use crate::incidents::prompts::build_incident_suggest_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{try_complete, CompletionProvider, PromptMessage};

const CAPABILITY: &str = "incident-suggest";

/// Proposes title, severity, tags and next actions for a new incident.
///
/// The heuristic result is computed first and doubles as the default for every
/// field the model leaves out. The only error is a non-numeric model confidence.
pub async fn incident_suggest(
    llm: Option<&dyn CompletionProvider>,
    title: &str,
    description: &str,
) -> Result<SuggestResult, NormalizeError> {
    let title = title.trim();
    let description = description.trim();
    let fallback = basic_incident_suggest(title, description);

    let Some(llm) = llm else {
        return Ok(fallback);
    };

    let prompt = build_incident_suggest_prompt(title, description);
    match try_complete(llm, CAPABILITY, JSON_ONLY_SYSTEM, &[PromptMessage::user(prompt)]).await {
        Some(raw) => normalize_suggest(&raw, fallback),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::Severity;
    use crate::llm_client::testing::ScriptedProvider;
    use crate::llm_client::UnavailableProvider;

    #[tokio::test]
    async fn test_without_provider_returns_heuristics() {
        let result = incident_suggest(None, "  Total outage ", " db down ").await.unwrap();
        assert_eq!(result, basic_incident_suggest("Total outage", "db down"));
        assert_eq!(result.severity_proposed, Severity::Sev1);
        assert_eq!(result.tags, vec!["db"]);
    }

    #[tokio::test]
    async fn test_provider_error_returns_heuristics() {
        let result = incident_suggest(Some(&UnavailableProvider), "Typo on footer", "")
            .await
            .unwrap();
        assert_eq!(result, basic_incident_suggest("Typo on footer", ""));
    }

    #[tokio::test]
    async fn test_model_json_is_merged_over_heuristics() {
        let provider = ScriptedProvider::replying(
            "```json\n{\"suggestedTitle\": \"Auth token refresh failing\", \"confidence\": 0.9}\n```",
        );
        let result = incident_suggest(Some(&provider), "login broken", "auth 5xx")
            .await
            .unwrap();
        let fallback = basic_incident_suggest("login broken", "auth 5xx");
        assert_eq!(result.suggested_title, "Auth token refresh failing");
        assert!((result.confidence - 0.9).abs() < f64::EPSILON);
        assert_eq!(result.summary, fallback.summary);
        assert_eq!(result.tags, fallback.tags);
    }

    #[tokio::test]
    async fn test_request_uses_json_system_prompt_and_single_user_message() {
        let provider = ScriptedProvider::replying("{}");
        incident_suggest(Some(&provider), "t", "d").await.unwrap();
        let calls = provider.calls();
        assert_eq!(calls[0].system_prompt, JSON_ONLY_SYSTEM);
        assert_eq!(calls[0].messages.len(), 1);
        assert!(calls[0].messages[0].content.contains("Title: t"));
    }

    #[tokio::test]
    async fn test_non_numeric_confidence_fails_request() {
        let provider = ScriptedProvider::replying(r#"{"confidence": "very high"}"#);
        let result = incident_suggest(Some(&provider), "t", "d").await;
        assert!(matches!(result, Err(NormalizeError::Confidence(_))));
    }
}
