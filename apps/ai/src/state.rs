use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Present only in Direct mode. `None` sends every request to the heuristics.
    pub llm: Option<Arc<dyn CompletionProvider>>,
    pub config: Config,
}

impl AppState {
    pub fn completion(&self) -> Option<&dyn CompletionProvider> {
        self.llm.as_deref()
    }
}
