//! Unified error handling with Sentry breadcrumbs.
//!
//! Every cart operation funnels its failure into a `CartError`. The store
//! never returns these to its caller: it logs them, then reports the
//! operation's user-facing message through the `Notifier`.

use rocketshoes_core::{CartShapeError, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// User-facing messages reported by cart operations.
pub mod messages {
    /// The requested quantity exceeds the product's stock.
    pub const QUANTITY_UNAVAILABLE: &str = "requested quantity unavailable";
    /// Adding a product failed for any other reason.
    pub const ADD_FAILED: &str = "failed to add product";
    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "failed to remove product";
    /// Updating a product's quantity failed.
    pub const UPDATE_FAILED: &str = "failed to update quantity";
}

/// The cart operation an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic user-facing failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => messages::ADD_FAILED,
            Self::Remove => messages::REMOVE_FAILED,
            Self::UpdateAmount => messages::UPDATE_FAILED,
        }
    }

    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::UpdateAmount => "update_amount",
        }
    }
}

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// Product or stock lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the snapshot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart would hold more units than are in stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product has no entry in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The mutation would break the cart's shape invariants.
    #[error("Invalid cart: {0}")]
    Shape(#[from] CartShapeError),
}

impl CartError {
    /// The message shown to the user when `operation` fails with this error.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => messages::QUANTITY_UNAVAILABLE,
            _ => operation.failure_message(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Add a breadcrumb for a committed cart mutation.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// changes leading up to an error.
pub fn add_breadcrumb(operation: CartOperation, product_id: ProductId, item_count: u64) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(format!("Cart {}", operation.as_str())),
        level: sentry::Level::Info,
        ..Default::default()
    };

    breadcrumb.data.insert(
        "product_id".to_string(),
        serde_json::Value::from(product_id.as_i32()),
    );
    breadcrumb
        .data
        .insert("item_count".to_string(), serde_json::Value::from(item_count));

    sentry::add_breadcrumb(breadcrumb);
}
