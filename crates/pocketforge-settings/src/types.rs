//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so partial JSON files are valid — missing fields get their compiled
//! default during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings for PocketForge.
///
/// Loaded from `~/.pocketforge/settings.json` with defaults applied for
/// missing fields. `POCKETFORGE_*` environment variables override specific
/// values after the file layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForgeSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Reasoning capability (Gemini) settings.
    pub reasoner: ReasonerSettings,
    /// Source digest settings.
    pub digest: DigestSettings,
    /// Storage locations.
    pub storage: StorageSettings,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "pocketforge".to_string(),
            reasoner: ReasonerSettings::default(),
            digest: DigestSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

/// Reasoning capability client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReasonerSettings {
    /// Model name.
    pub model: String,
    /// API key. Usually supplied via `POCKETFORGE_API_KEY` or
    /// `GEMINI_API_KEY`, not the settings file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (tests point this at a mock server).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Output token budget for the canonicalize call.
    pub canonicalize_max_output_tokens: u32,
    /// Output token budget for the generate call.
    pub generate_max_output_tokens: u32,
    /// Thinking budget shared by both calls.
    pub thinking_budget: u32,
}

impl Default for ReasonerSettings {
    fn default() -> Self {
        Self {
            model: "gemini-3-pro-preview".to_string(),
            api_key: None,
            base_url: None,
            canonicalize_max_output_tokens: 60_000,
            generate_max_output_tokens: 100_000,
            thinking_budget: 8_000,
        }
    }
}

/// Source digest settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigestSettings {
    /// Per-file content prefix cap, in characters. Truncation is
    /// intentional — it respects the capability's input-size limit.
    pub per_file_char_cap: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            per_file_char_cap: 500,
        }
    }
}

/// Storage locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Data directory holding `history.json`. `None` resolves to
    /// `~/.pocketforge` at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
