//! # pocketforge-settings
//!
//! Configuration management with layered sources for PocketForge.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`ForgeSettings::default()`]
//! 2. **User file** — `~/.pocketforge/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `POCKETFORGE_*` overrides (highest priority)
//!
//! The only external credential is the Gemini API key, taken from
//! `POCKETFORGE_API_KEY` or `GEMINI_API_KEY`.
//!
//! The global singleton is reloadable: [`reload_settings_from_path`]
//! swaps the cached value so all subsequent [`get_settings`] calls
//! return fresh data.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, default_data_dir, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::path::Path;
use std::sync::{Arc, RwLock};

/// Global settings singleton.
///
/// Uses `RwLock<Option<Arc<ForgeSettings>>>` instead of `OnceLock` so the
/// cached value can be swapped after a reload. Reads are cheap (shared
/// lock + `Arc::clone`); writes only happen on reload, which is rare.
static SETTINGS: RwLock<Option<Arc<ForgeSettings>>> = RwLock::new(None);

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.pocketforge/settings.json` with
/// env var overrides. On subsequent calls, returns the cached value. If
/// loading fails, returns compiled defaults.
pub fn get_settings() -> Arc<ForgeSettings> {
    // Fast path: read lock
    {
        let guard = SETTINGS.read().expect("settings lock poisoned");
        if let Some(ref s) = *guard {
            return Arc::clone(s);
        }
    }

    // Slow path: first access, take write lock
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    // Double-check after acquiring write lock
    if let Some(ref s) = *guard {
        return Arc::clone(s);
    }

    let settings = Arc::new(match load_settings() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            ForgeSettings::default()
        }
    });
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Initialize the global settings with a specific value.
///
/// Replaces any previously cached settings. Useful for tests and CLI
/// startup where flags override the file layer.
pub fn init_settings(settings: ForgeSettings) {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(Arc::new(settings));
}

/// Reload settings from a specific file path, swapping the global cache.
pub fn reload_settings_from_path(path: &Path) {
    let new = Arc::new(match load_settings_from_path(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
            ForgeSettings::default()
        }
    });
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(new);
    tracing::info!(?path, "settings reloaded from disk");
}

/// Reset the global settings cache (test-only).
#[cfg(test)]
pub(crate) fn reset_settings() {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = None;
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Serializes tests that touch process env vars or the settings
    /// global. Loading reads env, so both kinds share one lock.
    pub(crate) static GLOBAL_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::GLOBAL_LOCK;

    #[test]
    fn init_settings_sets_custom_value() {
        let _lock = GLOBAL_LOCK.lock().unwrap();
        reset_settings();
        let mut custom = ForgeSettings::default();
        custom.digest.per_file_char_cap = 1_000;
        init_settings(custom);
        assert_eq!(get_settings().digest.per_file_char_cap, 1_000);
        reset_settings();
    }

    #[test]
    fn reload_from_path_swaps_cached_value() {
        let _lock = GLOBAL_LOCK.lock().unwrap();
        reset_settings();
        init_settings(ForgeSettings::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"reasoner": {"model": "gemini-flash"}}"#).unwrap();

        reload_settings_from_path(&path);
        assert_eq!(get_settings().reasoner.model, "gemini-flash");
        reset_settings();
    }

    #[test]
    fn get_settings_returns_arc_snapshot() {
        let _lock = GLOBAL_LOCK.lock().unwrap();
        reset_settings();
        init_settings(ForgeSettings::default());

        let snapshot = get_settings();
        let mut new = ForgeSettings::default();
        new.digest.per_file_char_cap = 42;
        init_settings(new);

        // Snapshot keeps the old value (Arc isolation)
        assert_eq!(snapshot.digest.per_file_char_cap, 500);
        assert_eq!(get_settings().digest.per_file_char_cap, 42);
        reset_settings();
    }
}
