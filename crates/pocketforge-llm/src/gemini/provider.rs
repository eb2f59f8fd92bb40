//! `GeminiReasoner` implementing the [`Reasoner`] trait.
//!
//! Single non-streaming `generateContent` call per operation, with a
//! schema-constrained JSON response. The capability silently truncates
//! output beyond `maxOutputTokens`; the decode boundary catches that as
//! a schema error.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, error, instrument};

use pocketforge_core::artifact::Artifact;
use pocketforge_core::canonical::CanonicalProject;

use crate::decode::{decode_artifacts, decode_canonical};
use crate::error_parsing::parse_api_error;
use crate::reasoner::{
    CanonicalizeRequest, GenerateRequest, Reasoner, ReasonerError, ReasonerResult,
};

use super::schema::{
    artifact_response_schema, canonical_response_schema, canonicalize_prompt, generate_prompt,
};
use super::types::{
    Content, GeminiConfig, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, ThinkingConfig, DEFAULT_BASE_URL,
};

/// Gemini reasoning provider.
pub struct GeminiReasoner {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiReasoner {
    /// Create a new provider.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new provider with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Build HTTP headers. Gemini uses `x-goog-api-key` (not Bearer auth).
    fn build_headers(&self) -> ReasonerResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| ReasonerError::Auth {
                message: format!("invalid API key header: {e}"),
            })?,
        );
        Ok(headers)
    }

    fn endpoint_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!(
            "{base}/v1beta/models/{model}:generateContent",
            model = self.config.model
        )
    }

    fn build_request(
        prompt: String,
        response_schema: Value,
        max_output_tokens: u32,
        thinking_budget: u32,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens,
                response_mime_type: "application/json",
                response_schema,
                thinking_config: ThinkingConfig { thinking_budget },
            },
        }
    }

    /// Perform one `generateContent` call and return the raw output text.
    #[instrument(skip_all, fields(model = %self.config.model, max_output_tokens = max_output_tokens))]
    async fn generate_content(
        &self,
        prompt: String,
        response_schema: Value,
        max_output_tokens: u32,
    ) -> ReasonerResult<String> {
        let request = Self::build_request(
            prompt,
            response_schema,
            max_output_tokens,
            self.config.thinking_budget,
        );
        let headers = self.build_headers()?;

        debug!(
            prompt_bytes = request.contents[0].parts[0].text.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint_url())
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let err_info = parse_api_error(&body_text, status.as_u16());
            error!(
                status = status.as_u16(),
                code = err_info.code.as_deref().unwrap_or("unknown"),
                "Gemini API error"
            );
            if status.as_u16() == 429 {
                return Err(ReasonerError::RateLimited {
                    message: err_info.message,
                });
            }
            return Err(ReasonerError::Api {
                status: status.as_u16(),
                message: err_info.message,
                code: err_info.code,
                retryable: err_info.retryable,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or_else(|| ReasonerError::Schema {
            detail: "response carried no candidate text".to_string(),
        })
    }
}

#[async_trait]
impl Reasoner for GeminiReasoner {
    #[instrument(skip_all, fields(runtime = %request.runtime))]
    async fn canonicalize(
        &self,
        request: &CanonicalizeRequest,
    ) -> ReasonerResult<CanonicalProject> {
        let prompt = canonicalize_prompt(request);
        let text = self
            .generate_content(
                prompt,
                canonical_response_schema(),
                self.config.canonicalize_max_output_tokens,
            )
            .await?;
        decode_canonical(&text, request.runtime)
    }

    #[instrument(skip_all, fields(project = %request.canonical.meta.name))]
    async fn generate_artifacts(&self, request: &GenerateRequest) -> ReasonerResult<Vec<Artifact>> {
        let prompt = generate_prompt(request).map_err(|e| ReasonerError::Schema {
            detail: format!("canonical plan not serializable: {e}"),
        })?;
        let text = self
            .generate_content(
                prompt,
                artifact_response_schema(),
                self.config.generate_max_output_tokens,
            )
            .await?;
        decode_artifacts(&text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pocketforge_core::canonical::RuntimeTarget;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GeminiReasoner {
        let mut config = GeminiConfig::new("gemini-3-pro-preview", "test-key");
        config.base_url = Some(server.uri());
        GeminiReasoner::new(config)
    }

    fn canonicalize_request() -> CanonicalizeRequest {
        CanonicalizeRequest {
            digest: "FILE: page.tsx\nCONTENT: export default {}...".into(),
            runtime: RuntimeTarget::PythonFastapi,
            instructions: None,
        }
    }

    fn candidate_response(text: &str) -> Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    const MINIMAL_CANONICAL: &str = r##"{
        "meta": {"name": "Health", "description": "d", "reasoning": "r"},
        "api": {"endpoints": []},
        "logic": {"flows": []},
        "ui": {"pages": [], "theme":
            {"primaryColor": "#000", "fontFamily": "Inter", "style": "minimal"}},
        "dependencies": []
    }"##;

    // ── Request building ────────────────────────────────────────────────

    #[test]
    fn endpoint_url_uses_model() {
        let config = GeminiConfig::new("gemini-3-pro-preview", "k");
        let provider = GeminiReasoner::new(config);
        assert_eq!(
            provider.endpoint_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn headers_use_goog_api_key() {
        let provider = GeminiReasoner::new(GeminiConfig::new("m", "test-key"));
        let headers = provider.build_headers().unwrap();
        assert_eq!(headers["x-goog-api-key"], "test-key");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn invalid_api_key_is_auth_error() {
        let provider = GeminiReasoner::new(GeminiConfig::new("m", "bad\nkey"));
        assert_matches!(provider.build_headers(), Err(ReasonerError::Auth { .. }));
    }

    // ── Canonicalize ────────────────────────────────────────────────────

    #[tokio::test]
    async fn canonicalize_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-pro-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response(MINIMAL_CANONICAL)),
            )
            .mount(&server)
            .await;

        let project = provider_for(&server)
            .canonicalize(&canonicalize_request())
            .await
            .unwrap();
        assert_eq!(project.meta.name, "Health");
        assert_eq!(project.meta.target.runtime, RuntimeTarget::PythonFastapi);
    }

    #[tokio::test]
    async fn canonicalize_truncated_output_is_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_response(r#"{"meta": {"name": "trunc"#)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .canonicalize(&canonicalize_request())
            .await
            .unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }

    #[tokio::test]
    async fn canonicalize_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Quota exceeded",
                          "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .canonicalize(&canonicalize_request())
            .await
            .unwrap_err();
        assert_matches!(err, ReasonerError::RateLimited { message } => {
            assert!(message.contains("Quota exceeded"));
        });
    }

    #[tokio::test]
    async fn canonicalize_403_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key invalid",
                          "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .canonicalize(&canonicalize_request())
            .await
            .unwrap_err();
        assert_matches!(err, ReasonerError::Api { status: 403, retryable: false, .. });
    }

    #[tokio::test]
    async fn empty_candidates_is_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .canonicalize(&canonicalize_request())
            .await
            .unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }

    // ── Generate ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn generate_success_mints_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(
                r#"[{"path": "main.py", "content": "app", "type": "code"}]"#,
            )))
            .mount(&server)
            .await;

        let canonical =
            crate::decode::decode_canonical(MINIMAL_CANONICAL, RuntimeTarget::PythonFastapi)
                .unwrap();
        let artifacts = provider_for(&server)
            .generate_artifacts(&GenerateRequest {
                canonical,
                instructions: None,
            })
            .await
            .unwrap();
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].id.starts_with("art_"));
    }

    #[tokio::test]
    async fn generate_garbled_output_is_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response("not json [")),
            )
            .mount(&server)
            .await;

        let canonical =
            crate::decode::decode_canonical(MINIMAL_CANONICAL, RuntimeTarget::PythonFastapi)
                .unwrap();
        let err = provider_for(&server)
            .generate_artifacts(&GenerateRequest {
                canonical,
                instructions: None,
            })
            .await
            .unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }
}
