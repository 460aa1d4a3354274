//! Local persistent key-value store.
//!
//! One string blob per key, written to a data directory. Persistence is
//! strictly best-effort: when no directory is configured (or it cannot be
//! created), the store runs disabled and every operation is a no-op; read
//! failures of any kind are logged and reported as absence. Callers never
//! see an error from this layer.

use std::fs;
use std::path::{Path, PathBuf};

/// File-backed store for single-blob entries.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: Option<PathBuf>,
}

impl LocalStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// Passing `None`, or a directory that cannot be created, yields a
    /// disabled store whose operations are no-ops.
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.and_then(|dir| match fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                tracing::warn!("Local store disabled, cannot create {}: {e}", dir.display());
                None
            }
        });

        Self { dir }
    }

    /// A store with no backing directory; every operation is a no-op.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { dir: None }
    }

    /// Whether the store has a backing directory.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_deref().map(|dir| dir.join(format!("{key}.json")))
    }

    /// Load the blob stored under `key`.
    ///
    /// Absent entries, unreadable files, and a disabled store all yield
    /// `None`; failures are logged, never raised.
    #[must_use]
    pub fn load(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    /// Store `value` under `key`, best-effort.
    pub fn save(&self, key: &str, value: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        if let Err(e) = write_atomically(&path, value) {
            tracing::warn!("Failed to write {}: {e}", path.display());
        }
    }

    /// Remove the entry stored under `key`, best-effort.
    pub fn remove(&self, key: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {e}", path.display()),
        }
    }
}

/// Write via a temp file + rename so readers never observe partial writes.
fn write_atomically(path: &Path, value: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_remove_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(Some(dir.path().to_path_buf()));
        assert!(store.is_enabled());

        assert_eq!(store.load("greeting"), None);

        store.save("greeting", "hello");
        assert_eq!(store.load("greeting"), Some("hello".to_owned()));

        store.save("greeting", "replaced");
        assert_eq!(store.load("greeting"), Some("replaced".to_owned()));

        store.remove("greeting");
        assert_eq!(store.load("greeting"), None);
    }

    #[test]
    fn remove_of_absent_key_is_silent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(Some(dir.path().to_path_buf()));
        store.remove("never-stored");
    }

    #[test]
    fn disabled_store_is_a_no_op() {
        let store = LocalStore::disabled();
        assert!(!store.is_enabled());

        store.save("key", "value");
        assert_eq!(store.load("key"), None);
        store.remove("key");
    }

    #[test]
    fn none_dir_disables_store() {
        let store = LocalStore::new(None);
        assert!(!store.is_enabled());
    }

    #[test]
    fn entries_survive_a_new_store_over_the_same_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(Some(dir.path().to_path_buf()));
        store.save("key", "persisted");
        drop(store);

        let reopened = LocalStore::new(Some(dir.path().to_path_buf()));
        assert_eq!(reopened.load("key"), Some("persisted".to_owned()));
    }
}
