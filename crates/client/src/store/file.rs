//! File-backed store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Store;

/// One JSON document per namespace, written through on every mutation.
///
/// Mirrors browser local-storage semantics for a native client: reads come
/// from the in-memory map loaded at open, writes rewrite the whole document
/// before the mutation returns. A write failure (read-only disk, deleted
/// directory) degrades to memory-only operation with a warning; a failed
/// flush must not turn a cart edit into an error.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open (or create) the store for `namespace` under `dir`.
    ///
    /// A missing or malformed document loads as empty, not as an error.
    #[must_use]
    pub fn open(dir: &Path, namespace: &str) -> Self {
        if let Err(err) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot create storage directory");
        }

        let path = dir.join(format!("{namespace}.json"));
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "discarding malformed storage document");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Self { path, entries }
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot serialize storage document");
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %err, "cannot write storage document, continuing in memory");
        }
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}
