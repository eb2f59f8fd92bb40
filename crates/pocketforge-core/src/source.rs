//! Source file types — the normalized form of every upload.
//!
//! The ingestor turns archives, loose files, and pasted snippets into a
//! uniform sequence of [`SourceFile`]s. Content is always text; binary
//! content is not modeled.

use serde::{Deserialize, Serialize};

/// Optional classification hint narrowing the canonicalization prompt.
///
/// Never required — the reasoning capability must work without hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleHint {
    /// API surface (routes, handlers).
    Api,
    /// Business logic flow.
    Flow,
    /// Agent/automation code.
    Agent,
    /// Data model.
    Model,
    /// Infrastructure/config.
    Infra,
    /// User interface.
    Ui,
}

impl RoleHint {
    /// Lowercase wire name, as sent in the digest.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Flow => "flow",
            Self::Agent => "agent",
            Self::Model => "model",
            Self::Infra => "infra",
            Self::Ui => "ui",
        }
    }
}

/// One normalized input file.
///
/// `path` is unique within a session's source set by last-write-wins only;
/// no dedup invariant is enforced. Created by the ingestor, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Path of the file as uploaded (may contain directory separators).
    pub path: String,
    /// Raw text content.
    pub content: String,
    /// Language derived from the file extension (`"text"` when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Optional role classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_hint: Option<RoleHint>,
}

impl SourceFile {
    /// Create a source file, deriving `language` from the path extension.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = Some(language_from_path(&path));
        Self {
            path,
            content: content.into(),
            language,
            role_hint: None,
        }
    }
}

/// Derive a language tag from a path: the lower-cased extension, or
/// `"text"` when the file has none.
#[must_use]
pub fn language_from_path(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => "text".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── language_from_path ──────────────────────────────────────────────

    #[test]
    fn language_from_extension() {
        assert_eq!(language_from_path("src/main.rs"), "rs");
        assert_eq!(language_from_path("page.tsx"), "tsx");
    }

    #[test]
    fn language_lowercased() {
        assert_eq!(language_from_path("README.MD"), "md");
    }

    #[test]
    fn language_no_extension_is_text() {
        assert_eq!(language_from_path("Makefile"), "text");
        assert_eq!(language_from_path("src/Dockerfile"), "text");
    }

    #[test]
    fn language_dotfile_is_text() {
        // ".gitignore" has an empty stem, not an extension
        assert_eq!(language_from_path(".gitignore"), "text");
    }

    #[test]
    fn language_uses_last_segment() {
        assert_eq!(language_from_path("a.b/file"), "text");
    }

    // ── SourceFile ──────────────────────────────────────────────────────

    #[test]
    fn new_derives_language() {
        let f = SourceFile::new("app/server.py", "print('hi')");
        assert_eq!(f.language.as_deref(), Some("py"));
        assert!(f.role_hint.is_none());
    }

    #[test]
    fn serde_camel_case() {
        let mut f = SourceFile::new("api.ts", "export {}");
        f.role_hint = Some(RoleHint::Api);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["roleHint"], "api");
        assert_eq!(json["path"], "api.ts");
    }

    #[test]
    fn serde_omits_absent_optionals() {
        let f = SourceFile {
            path: "x".into(),
            content: String::new(),
            language: None,
            role_hint: None,
        };
        let json = serde_json::to_value(&f).unwrap();
        assert!(json.get("language").is_none());
        assert!(json.get("roleHint").is_none());
    }

    #[test]
    fn role_hint_as_str() {
        assert_eq!(RoleHint::Infra.as_str(), "infra");
        assert_eq!(RoleHint::Ui.as_str(), "ui");
    }
}
