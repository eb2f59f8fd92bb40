//! Generated output files.
//!
//! The artifact set is the terminal output of a session: written once,
//! never patched in place. Re-generation replaces the whole set.

use serde::{Deserialize, Serialize};

use crate::ids;

/// Classification of one generated file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Source code.
    Code,
    /// Configuration.
    Config,
    /// Documentation.
    Doc,
}

/// One generated output file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Freshly minted unique ID (`art_`-prefixed), never reused.
    pub id: String,
    /// Output path (may contain directory separators to express a tree).
    pub path: String,
    /// File content.
    pub content: String,
    /// Classification. Wire name is `type`.
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Create an artifact with a fresh ID.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            id: ids::artifact_id(),
            path: path.into(),
            content: content.into(),
            kind,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
