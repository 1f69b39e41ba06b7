//! Product and stock lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the read-only seam the cart store calls into
//! - [`HttpCatalog`] talks to the product API over `reqwest`
//! - Product descriptors are cached in memory via `moka`; stock never is,
//!   since the cart must validate against the current ceiling
//!
//! # Endpoints
//!
//! - `GET {api_url}/stock/{id}` -> `{ "id": 1, "amount": 5 }`
//! - `GET {api_url}/products/{id}` -> `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`

mod http;

pub use http::HttpCatalog;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when looking up products or stock.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API answered with a different product than the one requested.
    #[error("Requested product {requested}, got product {returned}")]
    ProductMismatch {
        requested: ProductId,
        returned: ProductId,
    },
}

/// Read-only access to product descriptors and stock ceilings.
pub trait Catalog: Send + Sync {
    /// Fetch the purchasable stock for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send;

    /// Fetch the descriptor of a product.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("products/7".to_string());
        assert_eq!(err.to_string(), "Not found: products/7");

        let err = CatalogError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 502: bad gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CatalogError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
