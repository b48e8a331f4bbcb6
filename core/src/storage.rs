//! Durable string key-value storage behind the session store and the
//! persisted base-URL override.
//!
//! # Design
//! `Storage` is deliberately small — get/set/remove on string keys — so the
//! rest of the crate never cares where values live. `MemoryStore` backs
//! tests and ephemeral clients; `FileStore` persists a single JSON file
//! under the platform config directory. Writes never raise: a failed flush
//! is logged and the in-memory view stays authoritative for the process.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Storage key for the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key for the serialized user profile.
pub const USER_KEY: &str = "user";
/// Storage key for a persisted base-URL override.
pub const BASE_URL_KEY: &str = "api_base_url";

/// A durable string key-value store.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage. Values live as long as the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// File-backed storage: one JSON object of string-to-string entries.
///
/// The file is loaded once at open; every mutation rewrites it via a
/// temp-file rename. A missing or corrupt file reads as empty rather than
/// failing, matching the "malformed persisted state is no state" rule.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Default location under the platform config dir, e.g.
    /// `~/.config/lumina/storage.json` on Linux. `None` when the platform
    /// has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lumina").join("storage.json"))
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring corrupt storage file");
                HashMap::new()
            }
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %err, "could not create storage directory");
                return;
            }
        }
        let tmp = self.path.with_extension("tmp");
        let result = serde_json::to_vec_pretty(entries)
            .map_err(io::Error::other)
            .and_then(|bytes| fs::write(&tmp, bytes))
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(err) = result {
            warn!(path = %self.path.display(), %err, "could not persist storage");
        }
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.set("k", "v2");
        assert_eq!(store.get("k"), Some("v2".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path);
        store.set(AUTH_TOKEN_KEY, "tok-123");
        store.set(USER_KEY, r#"{"id":1}"#);
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(AUTH_TOKEN_KEY), Some("tok-123".to_string()));
        assert_eq!(reopened.get(USER_KEY), Some(r#"{"id":1}"#.to_string()));
    }

    #[test]
    fn file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path);
        store.set("a", "1");
        store.remove("a");
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("a"), None);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nope.json"));
        assert_eq!(store.get("anything"), None);
    }
}
