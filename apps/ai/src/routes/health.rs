use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports the configured provider so operators can tell which path is live.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ai",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.config.provider.as_str(),
        "model": state.config.openai_model,
    }))
}
