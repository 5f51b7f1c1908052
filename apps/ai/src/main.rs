mod assistant;
mod config;
mod errors;
mod heuristics;
mod incidents;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, Provider, ProviderMode};
use crate::llm_client::{CompletionProvider, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting incident AI service v{}", env!("CARGO_PKG_VERSION"));

    let llm = build_completion_provider(&config)?;

    let state = AppState {
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the live client in Direct mode; `None` means every request uses the heuristics.
fn build_completion_provider(config: &Config) -> Result<Option<Arc<dyn CompletionProvider>>> {
    if let Some(name) = &config.unrecognised_provider {
        warn!("Unknown AI provider '{name}', using local heuristics");
    }

    match (config.provider_mode(), &config.openai_api_key) {
        (ProviderMode::Direct, Some(api_key)) => {
            let client = OpenAiClient::new(
                api_key.clone(),
                config.openai_model.clone(),
                &config.openai_base_url,
                config.llm_timeout,
            )?;
            info!(
                "Provider: {} (model: {}, timeout: {}s)",
                config.provider,
                config.openai_model,
                config.llm_timeout.as_secs()
            );
            Ok(Some(Arc::new(client)))
        }
        _ => {
            if config.provider == Provider::OpenAi {
                warn!("AI_PROVIDER=openai but OPENAI_API_KEY is not set, serving heuristic fallbacks only");
            } else {
                info!("Provider: {}, serving heuristic fallbacks only", config.provider);
            }
            Ok(None)
        }
    }
}
