// Global assistant: free-form questions answered from a caller-supplied incident list.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod query;
