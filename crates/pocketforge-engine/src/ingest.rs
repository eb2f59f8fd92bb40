//! Ingestion — normalizes uploads into [`SourceFile`]s.
//!
//! Three input shapes: zip archives, loose files, pasted snippets. All
//! content is text; an entry that is not valid UTF-8 fails the whole
//! ingestion call for that archive. Partial success is deliberately
//! unsupported — the caller retries with a cleaned-up upload instead of
//! silently working from an incomplete source set.

use std::io::Read;

use tracing::debug;

use pocketforge_core::errors::{ForgeError, Result};
use pocketforge_core::source::SourceFile;

/// Path segments excluded from archive ingestion: package caches, VCS
/// metadata, and bytecode caches. Matched as exact segments, not
/// substrings.
const SKIPPED_SEGMENTS: [&str; 3] = ["node_modules", ".git", "__pycache__"];

/// Whether any path segment is on the skip list.
fn has_skipped_segment(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| SKIPPED_SEGMENTS.contains(&segment))
}

/// Ingest a zip archive into a sequence of source files.
///
/// Skips directory entries and excluded segments; decodes everything else
/// as UTF-8 text with `language` derived from the extension.
pub fn ingest_archive(bytes: &[u8]) -> Result<Vec<SourceFile>> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| ForgeError::Zip(e.to_string()))?;

    let mut files = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ForgeError::Zip(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let path = entry.name().to_string();
        if has_skipped_segment(&path) {
            continue;
        }

        let mut raw = Vec::new();
        let _ = entry.read_to_end(&mut raw)?;
        let content =
            String::from_utf8(raw).map_err(|_| ForgeError::IngestDecode { path: path.clone() })?;

        files.push(SourceFile::new(path, content));
    }

    debug!(count = files.len(), "archive ingested");
    Ok(files)
}

/// Ingest one loose file.
pub fn ingest_file(name: &str, bytes: &[u8]) -> Result<SourceFile> {
    let content = String::from_utf8(bytes.to_vec()).map_err(|_| ForgeError::IngestDecode {
        path: name.to_string(),
    })?;
    Ok(SourceFile::new(name, content))
}

/// Wrap a pasted snippet.
///
/// No validation on content — emptiness is guarded upstream by the caller
/// disabling the action.
#[must_use]
pub fn ingest_snippet(name: &str, content: &str) -> SourceFile {
    SourceFile::new(name, content)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
