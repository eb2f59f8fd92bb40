//! Source digest — the compact text summary fed to canonicalization.
//!
//! One block per source file, in session order, with content truncated to
//! a per-file character cap so large uploads do not blow the prompt
//! budget. The cap counts characters, not bytes.

use pocketforge_core::source::SourceFile;

/// Render one file into its digest block.
fn digest_block(file: &SourceFile, cap: usize) -> String {
    let mut block = format!("FILE: {}", file.path);
    if let Some(hint) = file.role_hint {
        block.push_str("\nROLE: ");
        block.push_str(hint.as_str());
    }
    block.push_str("\nCONTENT: ");
    match file.content.char_indices().nth(cap) {
        Some((byte_idx, _)) => {
            block.push_str(&file.content[..byte_idx]);
            block.push_str("...");
        }
        None => block.push_str(&file.content),
    }
    block
}

/// Build the digest for a source set.
///
/// Blocks are joined with blank lines and preserve the order the sources
/// appear in the session.
#[must_use]
pub fn build_digest(sources: &[SourceFile], per_file_char_cap: usize) -> String {
    sources
        .iter()
        .map(|f| digest_block(f, per_file_char_cap))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
