// Incident chat and suggest capabilities.
// Each capability has a provider-backed path and a deterministic fallback.

pub mod chat;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod suggest;
