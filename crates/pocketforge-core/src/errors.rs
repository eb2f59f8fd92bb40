//! The `ForgeError` taxonomy.
//!
//! Every variant is terminal for the current run — nothing is retried
//! automatically. Schema failures from the reasoning capability almost
//! always mean its bounded output was truncated, so their messages carry
//! reduce-scope guidance instead of inviting a retry.

use thiserror::Error;

/// Convenience result alias for forge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Errors produced anywhere in the ingest → canonicalize → generate
/// pipeline.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// An archive entry (or loose file) could not be decoded as text.
    /// Aborts the whole ingestion call — partial success is deliberately
    /// unsupported.
    #[error("entry '{path}' is not valid UTF-8 text; the whole archive was rejected")]
    IngestDecode {
        /// Path of the offending entry.
        path: String,
    },

    /// The container itself is unreadable.
    #[error("invalid archive: {0}")]
    Zip(String),

    /// Canonicalizer output was not parseable/schema-conformant —
    /// typically the capability silently truncated its bounded output.
    #[error(
        "canonicalization output was invalid ({detail}); \
         try fewer files or shorter instructions"
    )]
    CanonicalizationSchema {
        /// Parse/validation detail.
        detail: String,
    },

    /// Artifact generator output was not parseable/schema-conformant.
    /// Hard failure — a silently empty artifact set is indistinguishable
    /// from a degenerate valid project.
    #[error(
        "generation output was invalid ({detail}); \
         try fewer files or shorter instructions"
    )]
    GenerationSchema {
        /// Parse/validation detail.
        detail: String,
    },

    /// The external call itself failed (auth, quota, network).
    #[error("reasoning capability unavailable (status {status:?}): {detail}")]
    CapabilityUnavailable {
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
        /// Failure detail.
        detail: String,
    },

    /// State machine guard violation (e.g. forging with no sources, or
    /// forging a session that already ran).
    #[error("invalid session state: expected {expected}, session is {actual}")]
    InvalidState {
        /// Required state description.
        expected: String,
        /// Observed state description.
        actual: String,
    },

    /// Artifact path rejected before export (traversal hardening).
    #[error("artifact path '{path}' is unsafe (absolute or contains '..')")]
    UnsafePath {
        /// The rejected path.
        path: String,
    },

    /// History persistence failure.
    #[error("history store error: {0}")]
    History(String),

    /// Filesystem I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
