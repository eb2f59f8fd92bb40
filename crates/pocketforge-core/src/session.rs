//! Session aggregate root and status lifecycle.
//!
//! A session exclusively owns its sources, canonical project, and
//! artifacts — no entity is shared by reference across owners. The status
//! lifecycle is `idle → analyzing → generating → ready`, with `error`
//! reachable from the two in-flight states. No state is reachable from
//! `ready` or `error` except by starting a brand-new session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::canonical::CanonicalProject;
use crate::ids;
use crate::source::SourceFile;

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting sources; a forge run may start.
    Idle,
    /// Canonicalizer call in flight.
    Analyzing,
    /// Artifact generator call in flight.
    Generating,
    /// Forge run completed; artifacts attached and session archived.
    Ready,
    /// Forge run failed; sources retained for a scoped-down retry.
    Error,
}

impl SessionStatus {
    /// Whether the session is mid-run (a second forge must not start).
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Analyzing | Self::Generating)
    }

    /// Whether the session reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// One project's run: sources in, canonical plan, artifacts out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ID (`sess_`-prefixed).
    pub id: String,
    /// User-facing session name (also seeds the export file name).
    pub name: String,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Free-text progress annotation. Observability only — no semantics.
    pub current_step: String,
    /// Ingested sources. Mutated only while idle.
    pub sources: Vec<SourceFile>,
    /// Canonical plan, attached on successful canonicalization.
    pub canonical: Option<CanonicalProject>,
    /// Generated artifacts, attached on successful generation.
    pub artifacts: Vec<Artifact>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl Session {
    /// Create a fresh idle session with no sources.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ids::session_id(),
            name: name.into(),
            status: SessionStatus::Idle,
            current_step: String::new(),
            sources: Vec::new(),
            canonical: None,
            artifacts: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Add sources. Path collisions are last-write-wins: an incoming file
    /// replaces an existing one at the same path.
    pub fn add_sources(&mut self, files: impl IntoIterator<Item = SourceFile>) {
        for file in files {
            if let Some(existing) = self.sources.iter_mut().find(|s| s.path == file.path) {
                *existing = file;
            } else {
                self.sources.push(file);
            }
        }
    }

    /// Remove one source by path. Returns whether anything was removed.
    pub fn remove_source(&mut self, path: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.path != path);
        self.sources.len() < before
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
