//! Key-value persistence for cart snapshots.
//!
//! The cart is stored as a single JSON blob under `{namespace}:cart`,
//! read once when the store opens and rewritten after every committed
//! mutation.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, used by tests and ephemeral sessions
//! - [`FileStorage`] - one JSON document on disk, rewritten atomically
//! - [`StorageBackend`] - whichever of the two the configuration selects

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;

use thiserror::Error;

use crate::config::StorageConfig;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot or storage document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The in-memory map was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A string-blob key-value store.
pub trait CartStorage: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage key holding the cart for `namespace`.
#[must_use]
pub fn cart_key(namespace: &str) -> String {
    format!("{namespace}:cart")
}

/// Storage selected by configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    File(FileStorage),
}

impl StorageBackend {
    /// Build the backend described by `config`.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        match &config.path {
            Some(path) => Self::File(FileStorage::new(path)),
            None => Self::Memory(MemoryStorage::new()),
        }
    }
}

impl CartStorage for StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Memory(storage) => storage.get(key).await,
            Self::File(storage) => storage.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Memory(storage) => storage.set(key, value).await,
            Self::File(storage) => storage.set(key, value).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_cart_key() {
        assert_eq!(cart_key("@RocketShoes"), "@RocketShoes:cart");
    }

    #[test]
    fn test_backend_from_config() {
        let memory = StorageBackend::from_config(&StorageConfig::default());
        assert!(matches!(memory, StorageBackend::Memory(_)));

        let file = StorageBackend::from_config(&StorageConfig {
            namespace: "@RocketShoes".to_string(),
            path: Some(PathBuf::from("cart.json")),
        });
        assert!(matches!(file, StorageBackend::File(_)));
    }

    #[tokio::test]
    async fn test_backend_delegates() {
        let backend = StorageBackend::Memory(MemoryStorage::new());
        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));

        let dir = tempfile::tempdir().unwrap();
        let backend = StorageBackend::from_config(&StorageConfig {
            namespace: "@RocketShoes".to_string(),
            path: Some(dir.path().join("storage.json")),
        });
        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
