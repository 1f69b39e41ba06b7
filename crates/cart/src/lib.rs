//! RocketShoes cart library.
//!
//! Keeps the user's shopping cart: which products it holds, how many of
//! each, and a persisted snapshot that survives restarts. Quantity changes
//! are validated against the product API's stock ceiling.
//!
//! # Modules
//!
//! - [`store`] - `CartStore`, the only writer of the cart
//! - [`catalog`] - product and stock lookups (`HttpCatalog`)
//! - [`storage`] - snapshot persistence (`MemoryStorage`, `FileStorage`)
//! - [`notify`] - user-facing messages
//! - [`config`] - environment configuration
//! - [`error`] - error types and user messages
//!
//! # Example
//!
//! ```no_run
//! use rocketshoes_cart::{CartConfig, CartStore, ProductId, TracingNotifier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CartConfig::from_env()?;
//! let store = CartStore::from_config(&config, TracingNotifier).await?;
//!
//! store.add_product(ProductId::new(1)).await;
//! store.update_product_amount(ProductId::new(1), 3).await;
//! println!("{} items", store.item_count());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogError, HttpCatalog};
pub use config::{CartConfig, CatalogConfig, ConfigError, StorageConfig};
pub use error::{CartError, CartOperation, messages};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use rocketshoes_core::{Cart, CartEntry, Product, ProductId, Quantity, Stock};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::CartStore;
