// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persisted assistant API key

use pagecraft_core::KeyValueStore;
use std::sync::Arc;

/// Storage key for the assistant credential
pub const API_KEY_KEY: &str = "assistant_api_key";

/// Holds the API key and writes it through to storage on every change
pub struct ApiKeyStore {
    storage: Arc<dyn KeyValueStore>,
    api_key: Option<String>,
}

fn normalize(raw: &str) -> Option<String> {
    let key = raw.trim();
    (!key.is_empty()).then(|| key.to_string())
}

impl ApiKeyStore {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let api_key = match storage.get(API_KEY_KEY) {
            Ok(raw) => raw.as_deref().and_then(normalize),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored API key");
                None
            }
        };
        Self { storage, api_key }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.api_key.is_some()
    }

    /// Store `raw`; a blank value clears the key. Returns the stored key.
    pub fn set(&mut self, raw: &str) -> Option<&str> {
        self.api_key = normalize(raw);
        let result = match &self.api_key {
            Some(key) => self.storage.set(API_KEY_KEY, key),
            None => self.storage.remove(API_KEY_KEY),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist API key");
        }
        self.api_key()
    }

    pub fn clear(&mut self) {
        self.set("");
    }
}

impl std::fmt::Debug for ApiKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyStore")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut keys = ApiKeyStore::open(storage.clone());
        assert!(!keys.is_set());

        assert_eq!(keys.set("  AIza-123 "), Some("AIza-123"));
        assert_eq!(storage.get(API_KEY_KEY).unwrap().as_deref(), Some("AIza-123"));
        assert_eq!(ApiKeyStore::open(storage).api_key(), Some("AIza-123"));
    }

    #[test]
    fn test_blank_clears() {
        let storage = Arc::new(MemoryStore::new());
        let mut keys = ApiKeyStore::open(storage.clone());
        keys.set("k");
        assert_eq!(keys.set("   "), None);
        assert_eq!(storage.get(API_KEY_KEY).unwrap(), None);
    }

    #[test]
    fn test_blank_stored_value_is_missing() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(API_KEY_KEY, "\n").unwrap();
        assert!(!ApiKeyStore::open(storage).is_set());
    }

    #[test]
    fn test_debug_redacts() {
        let mut keys = ApiKeyStore::open(Arc::new(MemoryStore::new()));
        keys.set("secret-key");
        assert!(!format!("{keys:?}").contains("secret-key"));
    }
}
