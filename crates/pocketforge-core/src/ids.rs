//! Prefixed UUIDv7 identifier generation.
//!
//! All PocketForge entities use string IDs of the form `<prefix>_<uuidv7>`.
//! UUIDv7 keeps IDs time-sortable, which makes history listings and logs
//! read in creation order without extra bookkeeping.

use uuid::Uuid;

/// Generate a session ID (`sess_`-prefixed UUIDv7).
#[must_use]
pub fn session_id() -> String {
    format!("sess_{}", Uuid::now_v7())
}

/// Generate an artifact ID (`art_`-prefixed UUIDv7).
///
/// Minted exactly once, at the decode boundary — the reasoning capability
/// is never trusted to produce stable identifiers.
#[must_use]
pub fn artifact_id() -> String {
    format!("art_{}", Uuid::now_v7())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
