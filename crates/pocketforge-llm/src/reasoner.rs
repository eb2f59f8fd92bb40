//! The [`Reasoner`] trait — the single seam to the external capability.
//!
//! Both operations are single suspending calls: no partial-result
//! streaming, no cancellation hook, no automatic retry. Schema failures
//! are almost always truncated-output conditions, so callers surface them
//! with reduce-scope guidance instead of retrying.

use async_trait::async_trait;
use thiserror::Error;

use pocketforge_core::artifact::Artifact;
use pocketforge_core::canonical::{CanonicalProject, RuntimeTarget};

/// Convenience result alias for reasoner operations.
pub type ReasonerResult<T> = Result<T, ReasonerError>;

/// Errors produced at the capability boundary.
#[derive(Debug, Error)]
pub enum ReasonerError {
    /// Returned payload was not parseable/schema-conformant (typically
    /// silent output truncation).
    #[error("schema-invalid output: {detail}")]
    Schema {
        /// Parse/validation detail.
        detail: String,
    },

    /// Non-2xx API response.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Parsed error message.
        message: String,
        /// Provider error code when present.
        code: Option<String>,
        /// Whether the provider marked the failure retryable.
        retryable: bool,
    },

    /// 429 rate limit / quota exhaustion.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Parsed error message.
        message: String,
    },

    /// Credential problem detected before the request was sent.
    #[error("auth error: {message}")]
    Auth {
        /// Detail.
        message: String,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Canonicalize request: bounded source digest + runtime + instructions.
#[derive(Clone, Debug)]
pub struct CanonicalizeRequest {
    /// Concatenated per-file `{path, roleHint, truncated-content}` digest.
    pub digest: String,
    /// Target runtime — stamped onto the result, never chosen by the
    /// capability.
    pub runtime: RuntimeTarget,
    /// Free-text user instructions.
    pub instructions: Option<String>,
}

/// Generate request: the full canonical project + instructions.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// The full canonical plan (not a digest).
    pub canonical: CanonicalProject,
    /// Free-text user instructions.
    pub instructions: Option<String>,
}

/// The external reasoning capability.
///
/// Implementations must validate payloads at this boundary and reject
/// anything non-conformant — raw parsed output is never trusted upward.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Derive the canonical project from a source digest.
    async fn canonicalize(&self, request: &CanonicalizeRequest)
        -> ReasonerResult<CanonicalProject>;

    /// Generate the output artifact set from a canonical project.
    ///
    /// Every returned artifact carries a freshly minted ID.
    async fn generate_artifacts(&self, request: &GenerateRequest) -> ReasonerResult<Vec<Artifact>>;
}
