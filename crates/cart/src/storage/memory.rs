//! In-memory storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CartStorage, StorageError};

/// Process-local key-value storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one blob.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing() {
        let storage = MemoryStorage::new();
        assert!(storage.get("@RocketShoes:cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = MemoryStorage::new();
        storage.set("key", "[]").await.unwrap();
        storage.set("key", "[1]").await.unwrap();
        assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemoryStorage::with_entry("key", "first");
        let handle = storage.clone();
        storage.set("key", "second").await.unwrap();
        assert_eq!(handle.get("key").await.unwrap().as_deref(), Some("second"));
    }
}
