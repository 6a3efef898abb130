//! JSON-file storage for sessions that outlive a process (the CLI).
//!
//! The file holds one flat JSON object of string values. Every call rereads
//! the file so two processes sharing a session file see each other's writes;
//! like local storage, the last writer wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::SessionStorage;

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt; treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) {
        let body = match serde_json::to_string_pretty(entries) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "session serialize failed");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, body) {
            tracing::warn!(path = %self.path.display(), error = %e, "session file write failed");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries();
        apply(&mut entries);
        self.write_entries(&entries);
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
