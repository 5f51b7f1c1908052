// Shared prompt constants used across capabilities.
// Each capability that calls the model defines its own prompts.rs alongside it.

/// Sampling temperature for every completion call.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// System prompt for calls whose user prompt describes a JSON schema.
pub const JSON_ONLY_SYSTEM: &str = "You answer strictly in JSON.";
