//! Settings loading: file layer, deep merge, and env overrides.
//!
//! Load order (later wins):
//! 1. Compiled defaults — [`ForgeSettings::default()`]
//! 2. `~/.pocketforge/settings.json`, deep-merged over defaults
//! 3. `POCKETFORGE_*` environment variables

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::types::ForgeSettings;

/// Path of the user settings file: `~/.pocketforge/settings.json`.
#[must_use]
pub fn settings_path() -> PathBuf {
    home_dir().join(".pocketforge").join("settings.json")
}

/// Default data directory: `~/.pocketforge`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    home_dir().join(".pocketforge")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// Deep-merge `overlay` onto `base`.
///
/// Objects merge key-by-key recursively; any other value type in the
/// overlay replaces the base value wholesale.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<ForgeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file path with env overrides applied.
///
/// A missing file is not an error — defaults are used for the file layer.
pub fn load_settings_from_path(path: &Path) -> Result<ForgeSettings> {
    let defaults = serde_json::to_value(ForgeSettings::default())?;

    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let file_layer: Value = serde_json::from_str(&raw)?;
        deep_merge(defaults, file_layer)
    } else {
        defaults
    };

    let mut settings: ForgeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Apply `POCKETFORGE_*` environment overrides (highest priority).
///
/// `GEMINI_API_KEY` is honored as a fallback credential source so the
/// standard Gemini variable works without a settings file.
fn apply_env_overrides(settings: &mut ForgeSettings) {
    if let Ok(key) = std::env::var("POCKETFORGE_API_KEY") {
        if !key.is_empty() {
            settings.reasoner.api_key = Some(key);
        }
    } else if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            settings.reasoner.api_key = Some(key);
        }
    }

    if let Ok(model) = std::env::var("POCKETFORGE_MODEL") {
        if !model.is_empty() {
            settings.reasoner.model = model;
        }
    }

    if let Ok(dir) = std::env::var("POCKETFORGE_DATA_DIR") {
        if !dir.is_empty() {
            settings.storage.data_dir = Some(dir);
        }
    }

    if let Ok(cap) = std::env::var("POCKETFORGE_DIGEST_CAP") {
        match cap.parse::<usize>() {
            Ok(parsed) if parsed > 0 => settings.digest.per_file_char_cap = parsed,
            _ => warn!(value = %cap, "ignoring invalid POCKETFORGE_DIGEST_CAP"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
