//! Session history — a newest-first list persisted as one JSON file.
//!
//! The whole list is serialized on every flush; write volume is a handful
//! of sessions, not a stream. Flushes go through a temp file and an
//! atomic rename so a crash mid-write never leaves a torn history.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use pocketforge_core::errors::{ForgeError, Result};
use pocketforge_core::session::Session;

/// File name of the history list inside the data directory.
pub const HISTORY_FILE: &str = "history.json";

/// Persistent, newest-first session history.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<Session>,
}

impl HistoryStore {
    /// Open the history at `path`, loading existing entries.
    ///
    /// A missing file is an empty history. A file that exists but does not
    /// parse is a hard error; it is never silently truncated.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| ForgeError::History(format!("corrupt history file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = entries.len(), "history opened");
        Ok(Self { path, entries })
    }

    /// Open the history inside a data directory, creating the directory
    /// when absent.
    pub fn open_in_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Self::open(dir.join(HISTORY_FILE))
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Session] {
        &self.entries
    }

    /// Look up one archived session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.entries.iter().find(|s| s.id == id)
    }

    /// Prepend a session and flush.
    ///
    /// When the flush fails, the in-memory list is rolled back so the
    /// store never claims an entry the file does not hold.
    pub fn push_front(&mut self, session: Session) -> Result<()> {
        self.entries.insert(0, session);
        if let Err(e) = self.flush() {
            let _ = self.entries.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// Write the full list via temp file + rename.
    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ForgeError::History(format!("serialize history: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            warn!(path = %self.path.display(), error = %e, "history flush failed");
            return Err(e.into());
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pocketforge_core::session::SessionStatus;

    fn ready_session(name: &str) -> Session {
        let mut s = Session::new(name);
        s.status = SessionStatus::Ready;
        s
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join(HISTORY_FILE)).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn open_in_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/data");
        let store = HistoryStore::open_in_dir(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn push_front_keeps_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open_in_dir(dir.path()).unwrap();
        store.push_front(ready_session("first")).unwrap();
        store.push_front(ready_session("second")).unwrap();
        assert_eq!(store.entries()[0].name, "second");
        assert_eq!(store.entries()[1].name, "first");
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id;
        {
            let mut store = HistoryStore::open_in_dir(dir.path()).unwrap();
            let s = ready_session("persisted");
            id = s.id.clone();
            store.push_front(s).unwrap();
        }
        let store = HistoryStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.get(&id).unwrap().name, "persisted");
    }

    #[test]
    fn get_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open_in_dir(dir.path()).unwrap();
        assert!(store.get("sess_nope").is_none());
    }

    #[test]
    fn corrupt_file_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert_matches!(HistoryStore::open(&path), Err(ForgeError::History(_)));
    }

    #[test]
    fn failed_flush_rolls_back_the_insert() {
        let dir = tempfile::tempdir().unwrap();
        // parent directory never created, so the temp-file write fails
        let path = dir.path().join("missing").join(HISTORY_FILE);
        let mut store = HistoryStore::open(&path).unwrap();
        assert_matches!(
            store.push_front(ready_session("doomed")),
            Err(ForgeError::Io(_))
        );
        assert!(store.entries().is_empty());
    }

    #[test]
    fn no_temp_file_left_behind_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open_in_dir(dir.path()).unwrap();
        store.push_front(ready_session("s")).unwrap();
        assert!(!dir.path().join("history.json.tmp").exists());
        assert!(dir.path().join(HISTORY_FILE).exists());
    }
}
