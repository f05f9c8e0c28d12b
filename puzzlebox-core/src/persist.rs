//! Persistence boundary.
//!
//! A session reads its saved state once at construction and writes it back
//! after every change to a persisted field. The storage medium belongs to the
//! host: browser local storage through the WASM bindings, sqlite in the API,
//! [`MemoryStore`] in tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Key-value store for JSON documents.
pub trait SaveStore: Send {
    /// Read the document stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the document stored under `key`.
    fn save(&self, key: &str, json: &str) -> Result<(), StoreError>;
}

/// Decode the document under `key`, if present.
pub fn load_json<T: DeserializeOwned>(store: &dyn SaveStore, key: &str) -> Result<Option<T>, StoreError> {
    match store.load(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode `value` and store it under `key`.
pub fn save_json<T: Serialize>(store: &dyn SaveStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.save(key, &json)
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what a session wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw document under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.docs.lock().ok()?.get(key).cloned()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let docs = self
            .docs
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(docs.get(key).cloned())
    }

    fn save(&self, key: &str, json: &str) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        docs.insert(key.to_string(), json.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        size: u8,
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(load_json::<Doc>(&store, "doc").unwrap(), None);

        save_json(&store, "doc", &Doc { size: 5 }).unwrap();
        assert_eq!(load_json::<Doc>(&store, "doc").unwrap(), Some(Doc { size: 5 }));
        assert_eq!(store.get("doc").as_deref(), Some(r#"{"size":5}"#));
    }

    #[test]
    fn test_clones_share_documents() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save("k", "1").unwrap();
        assert_eq!(handle.get("k").as_deref(), Some("1"));
    }

    #[test]
    fn test_corrupt_document() {
        let store = MemoryStore::new();
        store.save("doc", "not json").unwrap();
        assert!(matches!(load_json::<Doc>(&store, "doc"), Err(StoreError::Codec(_))));
    }
}
