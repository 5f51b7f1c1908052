/// LLM Client — the completion capability consumed by the chat, suggest and
/// assistant orchestrators.
///
/// No other module talks to a model provider directly. Orchestrators receive a
/// `CompletionProvider` from `AppState` and treat every `LlmError` as a signal to
/// degrade to their deterministic fallback.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Provider returned no choices")]
    NoChoices,

    #[error("No completion provider configured")]
    Unavailable,
}

/// Role of a message forwarded to the provider. The system prompt travels
/// separately, so only these two exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// The external completion capability.
///
/// `messages` are forwarded in order after `system_prompt`. An empty string is a
/// valid success value; callers decide what an empty reply means.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn generate_completion(
        &self,
        system_prompt: &str,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// Calls the provider and returns the trimmed reply, or `None` when the call
/// fails or the reply is blank. `None` demotes this one request to its
/// fallback; the provider stays configured for later requests.
pub async fn try_complete(
    provider: &dyn CompletionProvider,
    capability: &str,
    system_prompt: &str,
    messages: &[PromptMessage],
) -> Option<String> {
    match provider
        .generate_completion(system_prompt, messages, prompts::DEFAULT_TEMPERATURE)
        .await
    {
        Ok(reply) => {
            let reply = reply.trim();
            if reply.is_empty() {
                warn!("[{capability}] provider returned an empty reply, using fallback");
                None
            } else {
                debug!("[{capability}] provider reply received ({} chars)", reply.len());
                Some(reply.to_string())
            }
        }
        Err(e) => {
            warn!("[{capability}] provider call failed, using fallback: {e}");
            None
        }
    }
}

/// Stand-in provider that always fails. Lets the Direct path be exercised
/// without network access.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

#[async_trait]
impl CompletionProvider for UnavailableProvider {
    async fn generate_completion(
        &self,
        _system_prompt: &str,
        _messages: &[PromptMessage],
        _temperature: f32,
    ) -> Result<String, LlmError> {
        Err(LlmError::Unavailable)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI Chat Completions client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Live client for an OpenAI-compatible `/chat/completions` endpoint.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn generate_completion(
        &self,
        system_prompt: &str,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: build_request_messages(system_prompt, messages),
            temperature,
        };
        let url = self.chat_url();

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Provider returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let chat_response: ChatResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "Completion succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    self.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return first_choice_text(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// System message first, then the caller's messages in their original order.
fn build_request_messages<'a>(
    system_prompt: &'a str,
    messages: &'a [PromptMessage],
) -> Vec<ChatRequestMessage<'a>> {
    std::iter::once(ChatRequestMessage {
        role: "system",
        content: system_prompt,
    })
    .chain(messages.iter().map(|m| ChatRequestMessage {
        role: match m.role {
            PromptRole::User => "user",
            PromptRole::Assistant => "assistant",
        },
        content: &m.content,
    }))
    .collect()
}

fn first_choice_text(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or(LlmError::NoChoices)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;

    #[test]
    fn test_request_messages_put_system_first_and_keep_order() {
        let messages = vec![
            PromptMessage::user("A"),
            PromptMessage::assistant("B"),
            PromptMessage::user("C"),
        ];
        let built = build_request_messages("SYS", &messages);
        let pairs: Vec<(&str, &str)> = built.iter().map(|m| (m.role, m.content)).collect();
        assert_eq!(
            pairs,
            vec![
                ("system", "SYS"),
                ("user", "A"),
                ("assistant", "B"),
                ("user", "C")
            ]
        );
    }

    #[test]
    fn test_request_body_serializes_temperature_and_model() {
        let messages = vec![PromptMessage::user("hi")];
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: build_request_messages("SYS", &messages),
            temperature: 0.4,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!((value["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_first_choice_text_handles_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "");
    }

    #[test]
    fn test_first_choice_text_without_choices_is_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice_text(response),
            Err(LlmError::NoChoices)
        ));
    }

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        let client = OpenAiClient::new(
            "key".to_string(),
            "gpt-4o-mini".to_string(),
            "https://api.openai.com/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.chat_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_try_complete_trims_reply_and_uses_default_temperature() {
        let provider = ScriptedProvider::replying("  answer \n");
        let reply = try_complete(&provider, "test", "sys", &[PromptMessage::user("q")]).await;
        assert_eq!(reply.as_deref(), Some("answer"));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, "sys");
        assert!((calls[0].temperature - prompts::DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_try_complete_blank_reply_is_none() {
        let provider = ScriptedProvider::replying("   ");
        assert!(try_complete(&provider, "test", "sys", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_try_complete_error_is_none() {
        assert!(try_complete(&UnavailableProvider, "test", "sys", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_provider_always_fails() {
        let result = UnavailableProvider
            .generate_completion("sys", &[PromptMessage::user("q")], 0.4)
            .await;
        assert!(matches!(result, Err(LlmError::Unavailable)));
    }
}
