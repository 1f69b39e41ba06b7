//! The cart state store.
//!
//! [`CartStore`] owns the user's [`Cart`] and is the only thing that
//! mutates it. Each operation reads the committed cart, validates the
//! change against the catalog, persists the resulting snapshot, and only
//! then publishes it. A failure at any step leaves both the in-memory cart
//! and the persisted snapshot untouched and is reported to the user.
//!
//! Mutations are serialized: an operation holds the writer lock across its
//! catalog lookup, so two adds of the same product issued back to back
//! both land instead of one overwriting the other.

use std::sync::Arc;

use rocketshoes_core::{Cart, CartEntry, ProductId, Quantity};
use tokio::sync::{Mutex, watch};
use tracing::instrument;

use crate::catalog::{Catalog, CatalogError, HttpCatalog};
use crate::config::CartConfig;
use crate::error::{CartError, CartOperation, Result, add_breadcrumb};
use crate::notify::Notifier;
use crate::storage::{CartStorage, StorageBackend, StorageError, cart_key};

/// Shared cart state for one user session.
///
/// This struct is cheaply cloneable via `Arc`; clones operate on the same
/// cart.
pub struct CartStore<C, S, N> {
    inner: Arc<CartStoreInner<C, S, N>>,
}

struct CartStoreInner<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    key: String,
    writer: Mutex<()>,
    cart: watch::Sender<Cart>,
}

impl<C, S, N> Clone for CartStore<C, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Notifier> CartStore<HttpCatalog, StorageBackend, N> {
    /// Build a store from configuration: HTTP catalog plus the configured storage.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Catalog` if the HTTP client cannot be built, or
    /// `CartError::Storage` if the persisted snapshot cannot be read.
    pub async fn from_config(config: &CartConfig, notifier: N) -> Result<Self> {
        let catalog = HttpCatalog::new(&config.catalog)?;
        let storage = StorageBackend::from_config(&config.storage);

        Ok(Self::open(catalog, storage, notifier, &config.storage.namespace).await?)
    }
}

impl<C: Catalog, S: CartStorage, N: Notifier> CartStore<C, S, N> {
    /// Open the store, loading the cart persisted under `namespace`.
    ///
    /// A missing snapshot yields an empty cart. A snapshot that cannot be
    /// decoded (bad JSON, zero amounts, duplicate products) is discarded
    /// with a warning and the cart starts empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage itself cannot be read.
    pub async fn open(
        catalog: C,
        storage: S,
        notifier: N,
        namespace: &str,
    ) -> std::result::Result<Self, StorageError> {
        let key = cart_key(namespace);
        let cart = load_snapshot(&storage, &key).await?;
        tracing::debug!(key = %key, entries = cart.len(), "Cart loaded");

        let (cart, _) = watch::channel(cart);

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier,
                key,
                writer: Mutex::new(()),
                cart,
            }),
        })
    }

    /// Snapshot of the committed cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.cart.borrow().clone()
    }

    /// Total units in the committed cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.inner.cart.borrow().item_count()
    }

    /// Receive every committed cart.
    ///
    /// The receiver starts at the current cart and is notified once per
    /// successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.cart.subscribe()
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing entry if the stock allows it, otherwise
    /// appends a new entry with a single unit.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;

        let result = match self.prepare_add(product_id).await {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.settle(CartOperation::Add, product_id, result);
    }

    /// Remove a product's entry entirely.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;

        let result = match self.prepare_remove(product_id) {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.settle(CartOperation::Remove, product_id, result);
    }

    /// Set a product's quantity to exactly `amount`.
    ///
    /// Amounts of zero or less are ignored without notifying the user.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) {
        if amount <= 0 {
            tracing::debug!(amount, "Ignoring non-positive cart amount");
            return;
        }

        let _writer = self.inner.writer.lock().await;

        let result = match self.prepare_update(product_id, amount).await {
            Ok(next) => self.commit(next).await,
            Err(e) => Err(e),
        };
        self.settle(CartOperation::UpdateAmount, product_id, result);
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    async fn prepare_add(&self, product_id: ProductId) -> Result<Cart> {
        let mut next = self.cart();

        if let Some(current) = next.get(product_id).map(CartEntry::amount) {
            let stock = self.inner.catalog.stock(product_id).await?;
            let requested = current
                .incremented()
                .filter(|amount| stock.allows(*amount))
                .ok_or(CartError::OutOfStock {
                    product_id,
                    requested: u64::from(current.get()) + 1,
                    available: stock.amount,
                })?;
            next.set_amount(product_id, requested);
        } else {
            let product = self.inner.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::ProductMismatch {
                    requested: product_id,
                    returned: product.id,
                }
                .into());
            }
            next.push(CartEntry::new(product))?;
        }

        Ok(next)
    }

    fn prepare_remove(&self, product_id: ProductId) -> Result<Cart> {
        let mut next = self.cart();
        next.remove(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(next)
    }

    async fn prepare_update(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        let mut next = self.cart();
        if !next.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        let stock = self.inner.catalog.stock(product_id).await?;
        let requested = Quantity::try_from(amount)
            .ok()
            .filter(|quantity| stock.allows(*quantity))
            .ok_or(CartError::OutOfStock {
                product_id,
                requested: amount.unsigned_abs(),
                available: stock.amount,
            })?;
        next.set_amount(product_id, requested);

        Ok(next)
    }

    /// Persist `next`, then publish it. Returns the new item count.
    async fn commit(&self, next: Cart) -> Result<u64> {
        let snapshot = serde_json::to_string(&next).map_err(StorageError::from)?;
        self.inner.storage.set(&self.inner.key, &snapshot).await?;

        let item_count = next.item_count();
        self.inner.cart.send_replace(next);
        Ok(item_count)
    }

    fn settle(&self, operation: CartOperation, product_id: ProductId, result: Result<u64>) {
        match result {
            Ok(item_count) => {
                tracing::debug!(
                    operation = operation.as_str(),
                    item_count,
                    "Cart updated"
                );
                add_breadcrumb(operation, product_id, item_count);
            }
            Err(err) => {
                match &err {
                    CartError::OutOfStock { .. } | CartError::NotInCart(_) => {
                        tracing::info!(operation = operation.as_str(), error = %err, "Cart change rejected");
                    }
                    _ => {
                        tracing::warn!(operation = operation.as_str(), error = %err, "Cart operation failed");
                    }
                }
                self.inner
                    .notifier
                    .report_error(err.user_message(operation));
            }
        }
    }
}

/// Read the persisted cart, discarding snapshots that fail to decode.
async fn load_snapshot<S: CartStorage>(
    storage: &S,
    key: &str,
) -> std::result::Result<Cart, StorageError> {
    let Some(snapshot) = storage.get(key).await? else {
        return Ok(Cart::new());
    };

    match serde_json::from_str(&snapshot) {
        Ok(cart) => Ok(cart),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable cart snapshot");
            Ok(Cart::new())
        }
    }
}
