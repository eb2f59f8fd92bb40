//! Parsing of Gemini API error bodies.
//!
//! Error responses look like
//! `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`.
//! Bodies that don't match fall back to a trimmed snippet of the raw text.

use serde_json::Value;

use pocketforge_core::text::truncate_str;

/// Parsed error information from an API response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorInfo {
    /// Human-readable message.
    pub message: String,
    /// Provider status code string (e.g. `RESOURCE_EXHAUSTED`).
    pub code: Option<String>,
    /// Whether the condition is plausibly transient. Informational only —
    /// nothing in the pipeline retries automatically.
    pub retryable: bool,
}

/// Maximum raw-body snippet length when the body isn't structured.
const RAW_SNIPPET_BYTES: usize = 200;

/// Parse an API error body.
#[must_use]
pub fn parse_api_error(body: &str, http_status: u16) -> ApiErrorInfo {
    let retryable = matches!(http_status, 429 | 500 | 502 | 503 | 504);

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(err) = value.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown API error")
                .to_string();
            let code = err
                .get("status")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            return ApiErrorInfo {
                message,
                code,
                retryable,
            };
        }
    }

    let snippet = truncate_str(body.trim(), RAW_SNIPPET_BYTES);
    ApiErrorInfo {
        message: if snippet.is_empty() {
            format!("HTTP {http_status} with empty body")
        } else {
            snippet.to_string()
        },
        code: None,
        retryable,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
