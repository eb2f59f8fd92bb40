//! Deterministic in-memory [`Reasoner`] for tests.
//!
//! Holds the raw text each operation would have returned and feeds it
//! through the real decode boundary, so truncated/garbled fixtures
//! exercise exactly the same validation path as live output.

use async_trait::async_trait;

use pocketforge_core::artifact::Artifact;
use pocketforge_core::canonical::CanonicalProject;

use crate::decode::{decode_artifacts, decode_canonical};
use crate::reasoner::{CanonicalizeRequest, GenerateRequest, Reasoner, ReasonerResult};

/// A canned-response reasoner.
pub struct StubReasoner {
    canonical_response: String,
    artifacts_response: String,
}

/// Minimal valid canonicalizer output: one `GET /health` endpoint, one
/// `Home` page at `/`.
pub const MINIMAL_CANONICAL_JSON: &str = r##"{
    "meta": {"name": "Health App", "description": "Liveness demo",
             "reasoning": "Single health probe behind one page."},
    "api": {"endpoints": [
        {"id": "get_health", "method": "GET", "path": "/health",
         "triggersFlow": "health_check", "description": "Liveness probe"}
    ]},
    "logic": {"flows": [
        {"id": "health_check", "description": "Return ok",
         "steps": ["respond with status ok"]}
    ]},
    "ui": {"pages": [
        {"name": "Home", "route": "/", "components": ["StatusBadge"],
         "description": "Shows service status"}
    ], "theme": {"primaryColor": "#0f766e", "fontFamily": "Inter",
                 "style": "minimal"}},
    "dependencies": [{"name": "fastapi", "version": "0.110"}]
}"##;

/// Minimal valid generator output: one code artifact.
pub const MINIMAL_ARTIFACTS_JSON: &str = r#"[
    {"path": "app/main.py",
     "content": "from fastapi import FastAPI\napp = FastAPI()\n",
     "type": "code"}
]"#;

impl StubReasoner {
    /// A stub that succeeds with the minimal valid fixtures.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            canonical_response: MINIMAL_CANONICAL_JSON.to_string(),
            artifacts_response: MINIMAL_ARTIFACTS_JSON.to_string(),
        }
    }

    /// A stub with explicit raw responses (valid, truncated, or garbled).
    #[must_use]
    pub fn with_responses(
        canonical_response: impl Into<String>,
        artifacts_response: impl Into<String>,
    ) -> Self {
        Self {
            canonical_response: canonical_response.into(),
            artifacts_response: artifacts_response.into(),
        }
    }
}

#[async_trait]
impl Reasoner for StubReasoner {
    async fn canonicalize(
        &self,
        request: &CanonicalizeRequest,
    ) -> ReasonerResult<CanonicalProject> {
        decode_canonical(&self.canonical_response, request.runtime)
    }

    async fn generate_artifacts(&self, _request: &GenerateRequest) -> ReasonerResult<Vec<Artifact>> {
        decode_artifacts(&self.artifacts_response)
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

    use crate::reasoner::ReasonerError;

    fn request() -> CanonicalizeRequest {
        CanonicalizeRequest {
            digest: String::new(),
            runtime: RuntimeTarget::PythonFastapi,
            instructions: None,
        }
    }

    #[tokio::test]
    async fn valid_stub_canonicalizes() {
        let project = StubReasoner::valid().canonicalize(&request()).await.unwrap();
        assert_eq!(project.api.endpoints[0].path, "/health");
        assert_eq!(project.ui.pages[0].route, "/");
    }

    #[tokio::test]
    async fn truncated_stub_fails_schema() {
        let stub = StubReasoner::with_responses(
            &MINIMAL_CANONICAL_JSON[..40],
            MINIMAL_ARTIFACTS_JSON,
        );
        let err = stub.canonicalize(&request()).await.unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }
}
