// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key-value persistence.
//!
//! [`FileKvStore`] keeps the whole map in one JSON document and rewrites it
//! atomically (write to `.tmp`, then rename) on every mutation, so a crash
//! mid-write leaves the previous document intact.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Current on-disk schema version
pub const CURRENT_STORE_VERSION: u32 = 1;

/// Errors that can occur in storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported store version {0} (expected {CURRENT_STORE_VERSION})")]
    Version(u32),
}

/// A string key-value store that survives process restarts.
pub trait KvStore: Send + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Remove every key starting with `prefix`.
    fn clear(&mut self, prefix: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral sessions.
///
/// Clones share the same map, which lets a test simulate a process restart
/// by building a second store over the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn clear(&mut self, prefix: &str) -> Result<(), StorageError> {
        self.entries.lock().retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(rename = "v")]
    version: u32,
    updated_at: DateTime<Utc>,
    entries: BTreeMap<String, String>,
}

/// JSON-file-backed store.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store. An unreadable document is renamed
    /// to a `.bak` extension and the store starts empty, so corrupt state
    /// never blocks startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read(&path) {
            Ok(bytes) => match Self::decode(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    let bak = path.with_extension("bak");
                    tracing::warn!(
                        path = %path.display(),
                        backup = %bak.display(),
                        error = %e,
                        "unreadable state file, starting empty"
                    );
                    std::fs::rename(&path, &bak)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(bytes: &[u8]) -> Result<BTreeMap<String, String>, StorageError> {
        let doc: StoreDocument = serde_json::from_slice(bytes)?;
        if doc.version != CURRENT_STORE_VERSION {
            return Err(StorageError::Version(doc.version));
        }
        Ok(doc.entries)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let doc = StoreDocument {
            version: CURRENT_STORE_VERSION,
            updated_at: Utc::now(),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_vec_pretty(&doc)?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn clear(&mut self, prefix: &str) -> Result<(), StorageError> {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        if self.entries.len() != before {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
