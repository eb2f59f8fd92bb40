//! Gemini reasoning provider.
//!
//! Follows the composition pattern: `provider` (entry point), `schema`
//! (responseSchema payloads and prompt builders), `types` (config and
//! wire request/response types).

pub mod provider;
pub mod schema;
pub mod types;

pub use provider::GeminiReasoner;
pub use types::GeminiConfig;
