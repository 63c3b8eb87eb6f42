// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type and the persistence-store seam

use crate::block::BlockKind;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Error type for the builder core.
///
/// Document Store operations never surface these; they appear only at the
/// edges (parsing stored data, extracting assistant instructions, talking to
/// a persistence backend).
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Unknown block type: {0}")]
    UnknownBlockKind(String),

    #[error("Invalid {kind} content: {message}")]
    InvalidContent { kind: BlockKind, message: String },

    #[error("Missing defaults for block type {0}")]
    MissingDefaults(BlockKind),

    #[error("Malformed instruction: {0}")]
    MalformedInstruction(String),

    #[error("Storage error for key {key}: {message}")]
    Storage { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BuilderError {
    /// Wrap a backend failure for `key`
    pub fn storage(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;

/// Key-value persistence collaborator.
///
/// Values are whole JSON snapshots. Last write wins; there is no versioning.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "[1,2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2]"));
        store.set("k", "[]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_storage_error_message() {
        let err = BuilderError::storage("builder_blocks", "disk full");
        assert_eq!(err.to_string(), "Storage error for key builder_blocks: disk full");
    }
}
