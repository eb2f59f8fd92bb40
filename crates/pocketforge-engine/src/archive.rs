//! Zip export — packages a ready session's artifacts for download.
//!
//! Every artifact path is validated before any entry is written: a single
//! absolute or parent-escaping path fails the whole export, so a partial
//! archive is never produced.

use std::io::Write;

use tracing::debug;
use zip::write::FileOptions;

use pocketforge_core::errors::{ForgeError, Result};
use pocketforge_core::session::Session;

/// Derive the download file name from a session name.
///
/// Lower-cased, runs of whitespace collapsed to single hyphens, `.zip`
/// appended. An all-whitespace name falls back to `pocketforge.zip`.
#[must_use]
pub fn export_file_name(session_name: &str) -> String {
    let slug = session_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if slug.is_empty() {
        "pocketforge.zip".to_string()
    } else {
        format!("{slug}.zip")
    }
}

/// Reject paths that would escape the extraction directory.
fn check_entry_path(path: &str) -> Result<()> {
    let absolute = path.starts_with('/')
        || path.starts_with('\\')
        || path.get(1..2) == Some(":");
    let escapes = path.split(['/', '\\']).any(|segment| segment == "..");
    if absolute || escapes {
        return Err(ForgeError::UnsafePath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Build the export archive for a session.
///
/// Returns the derived file name and the zip bytes. Artifact paths become
/// entry paths verbatim; directories are implied, not written as entries.
pub fn export_zip(session: &Session) -> Result<(String, Vec<u8>)> {
    for artifact in &session.artifacts {
        check_entry_path(&artifact.path)?;
    }

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for artifact in &session.artifacts {
            writer
                .start_file(artifact.path.as_str(), options)
                .map_err(|e| ForgeError::Zip(e.to_string()))?;
            writer.write_all(artifact.content.as_bytes())?;
        }
        let _ = writer.finish().map_err(|e| ForgeError::Zip(e.to_string()))?;
    }

    let name = export_file_name(&session.name);
    debug!(
        file = %name,
        entries = session.artifacts.len(),
        "export archive built"
    );
    Ok((name, cursor.into_inner()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
