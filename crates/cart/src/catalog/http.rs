//! HTTP product API client.
//!
//! Caches product descriptors using `moka` (TTL from configuration).

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Characters of a response body kept in errors and logs.
const BODY_PREVIEW_CHARS: usize = 200;

/// Client for the product and stock API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the
/// product cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    products: Cache<ProductId, Product>,
}

impl HttpCatalog {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpCatalogInner {
                client: builder.build()?,
                base_url: with_trailing_slash(config.api_url.clone()),
                api_token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// Drop a cached product descriptor.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.products.invalidate(&id).await;
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = preview(&response_text);
            tracing::error!(
                status = %status,
                url = %url,
                body = %body,
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %preview(&response_text),
                "Failed to parse product API response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl Catalog for HttpCatalog {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }
}

/// Make `Url::join` resolve relative to the whole base path.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trailing_slash() {
        let url = with_trailing_slash(Url::parse("http://localhost:3333/api").unwrap());
        assert_eq!(url.join("stock/1").unwrap().as_str(), "http://localhost:3333/api/stock/1");

        let url = with_trailing_slash(Url::parse("http://localhost:3333").unwrap());
        assert_eq!(url.join("products/2").unwrap().as_str(), "http://localhost:3333/products/2");
    }

    #[test]
    fn test_preview_truncates() {
        let body = "x".repeat(500);
        assert_eq!(preview(&body).len(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_new_applies_config() {
        let mut config = CatalogConfig::new(Url::parse("http://localhost:3333/v1").unwrap());
        config.request_timeout = Some(std::time::Duration::from_secs(5));

        let catalog = HttpCatalog::new(&config).unwrap();
        assert_eq!(catalog.inner.base_url.as_str(), "http://localhost:3333/v1/");
    }
}
