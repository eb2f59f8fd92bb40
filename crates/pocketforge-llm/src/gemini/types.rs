//! Gemini configuration and wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default output token budget for canonicalize calls.
pub const DEFAULT_CANONICALIZE_MAX_OUTPUT_TOKENS: u32 = 60_000;

/// Default output token budget for generate calls. The larger budget
/// leaves room for full file contents after the thinking budget.
pub const DEFAULT_GENERATE_MAX_OUTPUT_TOKENS: u32 = 100_000;

/// Default thinking budget shared by both calls.
pub const DEFAULT_THINKING_BUDGET: u32 = 8_000;

/// Gemini provider configuration.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// Model name (e.g. `gemini-3-pro-preview`).
    pub model: String,
    /// API key.
    pub api_key: String,
    /// Base URL override (tests point this at a mock server).
    pub base_url: Option<String>,
    /// Output budget for canonicalize.
    pub canonicalize_max_output_tokens: u32,
    /// Output budget for generate.
    pub generate_max_output_tokens: u32,
    /// Thinking budget.
    pub thinking_budget: u32,
}

impl GeminiConfig {
    /// Create a config with default budgets.
    #[must_use]
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            canonicalize_max_output_tokens: DEFAULT_CANONICALIZE_MAX_OUTPUT_TOKENS,
            generate_max_output_tokens: DEFAULT_GENERATE_MAX_OUTPUT_TOKENS,
            thinking_budget: DEFAULT_THINKING_BUDGET,
        }
    }
}

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// User content parts.
    pub contents: Vec<Content>,
    /// Generation configuration (schema, budgets, MIME type).
    pub generation_config: GenerationConfig,
}

/// One content turn.
#[derive(Debug, Serialize)]
pub struct Content {
    /// Parts.
    pub parts: Vec<Part>,
}

/// One text part.
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    pub text: String,
}

/// Generation configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Output token cap. The capability silently truncates beyond this.
    pub max_output_tokens: u32,
    /// Always `application/json`.
    pub response_mime_type: &'static str,
    /// Fixed, versioned output schema.
    pub response_schema: Value,
    /// Thinking budget.
    pub thinking_config: ThinkingConfig,
}

/// Thinking configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Token budget for internal reasoning.
    pub thinking_budget: u32,
}

/// `generateContent` response body (the subset we read).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates; the first one carries the output.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One response candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content.
    pub content: Option<CandidateContent>,
}

/// Candidate content parts.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// Parts; text parts are concatenated.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GenerateContentResponse {
    /// Concatenate all text parts of the first candidate.
    ///
    /// Returns `None` when the response carries no candidates or no parts
    /// (e.g. a safety block).
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        if parts.is_empty() {
            return None;
        }
        Some(parts.iter().map(|p| p.text.as_str()).collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
