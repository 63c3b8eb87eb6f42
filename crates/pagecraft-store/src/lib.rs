// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pagecraft Store - Directory-backed persistence for builder snapshots
//!
//! Provides:
//! - One file per key under a root directory (`<key>.json`)
//! - Atomic replacement through a uniquely named temporary file
//! - The core `KeyValueStore` seam, so documents and themes persist here

use pagecraft_core::{BuilderError, KeyValueStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

const EXTENSION: &str = "json";

/// File-per-key store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "file store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }

    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Replace the value for `key`. Each write stages its own temporary
    /// file, so concurrent writers never share one and the last rename wins.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let io_error = |source: std::io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut staged = NamedTempFile::new_in(&self.root).map_err(io_error)?;
        staged.write_all(value.as_bytes()).map_err(io_error)?;
        staged.persist(&path).map_err(|e| io_error(e.error))?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> pagecraft_core::Result<Option<String>> {
        self.read(key).map_err(|e| BuilderError::storage(key, e))
    }

    fn set(&self, key: &str, value: &str) -> pagecraft_core::Result<()> {
        self.write(key, value)
            .map_err(|e| BuilderError::storage(key, e))
    }

    fn remove(&self, key: &str) -> pagecraft_core::Result<()> {
        self.delete(key).map_err(|e| BuilderError::storage(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::{BlockKind, DocumentStore, ThemePatch, ThemeStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.read("builder_blocks").unwrap(), None);
    }

    #[test]
    fn test_write_read_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.write("builder_theme", "{}").unwrap();
        store.write("builder_theme", r#"{"font":"Roboto"}"#).unwrap();
        assert_eq!(
            store.read("builder_theme").unwrap().as_deref(),
            Some(r#"{"font":"Roboto"}"#)
        );
        assert_eq!(store.keys().unwrap(), vec!["builder_theme".to_string()]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.write("k", "1").unwrap();
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for key in ["", "../escape", ".hidden", "a/b", "a b"] {
            assert!(
                matches!(store.write(key, "x"), Err(StoreError::InvalidKey(_))),
                "{key:?} accepted"
            );
        }
    }

    #[test]
    fn test_creates_nested_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        let store = FileStore::open(&root).unwrap();
        store.write("k", "v").unwrap();
        assert!(root.join("k.json").exists());
    }

    #[test]
    fn test_document_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStore::open(dir.path()).unwrap());

        let mut documents = DocumentStore::open(storage.clone());
        documents.insert_template("landing");
        documents.add_block(BlockKind::Testimonials);
        let mut themes = ThemeStore::open(storage.clone());
        themes.update(ThemePatch::border_radius_px(16));

        let storage = Arc::new(FileStore::open(dir.path()).unwrap());
        let reopened = DocumentStore::open(storage.clone());
        assert_eq!(reopened.document(), documents.document());
        assert_eq!(ThemeStore::open(storage).theme(), themes.theme());
    }

    #[test]
    fn test_concurrent_writers_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let writers: Vec<_> = ["first", "second"]
            .into_iter()
            .map(|name| {
                let store = FileStore::open(dir.path()).unwrap();
                std::thread::spawn(move || {
                    (0..200)
                        .filter(|i| store.write("builder_blocks", &format!("{name}-{i}")).is_err())
                        .count()
                })
            })
            .collect();

        for writer in writers {
            assert_eq!(writer.join().unwrap(), 0);
        }
        let last = FileStore::open(dir.path())
            .unwrap()
            .read("builder_blocks")
            .unwrap()
            .unwrap();
        assert!(last == "first-199" || last == "second-199", "torn value {last:?}");
        assert_eq!(
            FileStore::open(dir.path()).unwrap().keys().unwrap(),
            vec!["builder_blocks".to_string()]
        );
    }
}
