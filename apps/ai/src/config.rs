use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Local,
}

impl Provider {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAi),
            "local" => Some(Provider::Local),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Local => "local",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether requests call the model provider or go straight to the heuristics.
/// Decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    Direct,
    Fallback,
}

/// Application configuration loaded from environment variables.
/// Resolved once at startup and read-only afterwards.
#[derive(Clone)]
pub struct Config {
    pub provider: Provider,
    /// Provider name that was set but not recognised; `provider` is then `Local`.
    pub unrecognised_provider: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

// Keeps the credential out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("unrecognised_provider", &self.unrecognised_provider)
            .field("has_credential", &self.openai_api_key.is_some())
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_timeout", &self.llm_timeout)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Default for Config {
    /// Heuristics-only configuration with no credential.
    fn default() -> Self {
        Config {
            provider: Provider::Local,
            unrecognised_provider: None,
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(60),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let provider_setting = optional_env("AI_PROVIDER").or_else(|| optional_env("LLM_PROVIDER"));
        let (provider, unrecognised_provider) = match provider_setting {
            Some(name) => match Provider::parse(&name) {
                Some(provider) => (provider, None),
                None => (Provider::Local, Some(name)),
            },
            None => (defaults.provider, None),
        };

        let llm_timeout = match optional_env("LLM_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.llm_timeout,
        };

        let port = match optional_env("PORT") {
            Some(port) => port
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        Ok(Config {
            provider,
            unrecognised_provider,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: optional_env("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_timeout,
            port,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    pub fn provider_mode(&self) -> ProviderMode {
        match (self.provider, &self.openai_api_key) {
            (Provider::OpenAi, Some(_)) => ProviderMode::Direct,
            _ => ProviderMode::Fallback,
        }
    }
}

/// Unset and blank values both read as `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
