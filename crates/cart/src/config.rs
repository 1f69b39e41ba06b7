//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROCKETSHOES_API_URL` - Base URL of the product and stock API
//!
//! ## Optional
//! - `ROCKETSHOES_API_TOKEN` - Bearer token sent to the product API
//! - `ROCKETSHOES_API_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `ROCKETSHOES_STORAGE_NAMESPACE` - Storage key namespace (default: @RocketShoes)
//! - `ROCKETSHOES_STORAGE_PATH` - JSON file backing cart storage (default: in-memory)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product descriptor cache TTL (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_NAMESPACE: &str = "@RocketShoes";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Product and stock API configuration
    pub catalog: CatalogConfig,
    /// Cart persistence configuration
    pub storage: StorageConfig,
}

/// Product and stock API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub api_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout; requests wait indefinitely when unset
    pub request_timeout: Option<Duration>,
    /// How long product descriptors stay cached
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_url", &self.api_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

/// Cart persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key namespace; the cart lives under `{namespace}:cart`
    pub namespace: String,
    /// JSON file backing the store, or `None` for in-memory storage
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: None,
        }
    }
}

impl CatalogConfig {
    /// Configuration for `api_url` with default timeouts and caching.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            api_token: None,
            request_timeout: None,
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_lookup(&lookup)?;
        let storage = StorageConfig::from_lookup(&lookup);

        Ok(Self { catalog, storage })
    }
}

impl CatalogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_required(lookup, "ROCKETSHOES_API_URL")?;
        let api_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e.to_string())
        })?;

        let request_timeout = lookup("ROCKETSHOES_API_TIMEOUT_SECS")
            .map(|value| parse_secs("ROCKETSHOES_API_TIMEOUT_SECS", &value))
            .transpose()?;

        let product_cache_ttl = match lookup("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS") {
            Some(value) => parse_secs("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", &value)?,
            None => Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        };

        Ok(Self {
            api_url,
            api_token: lookup("ROCKETSHOES_API_TOKEN").map(SecretString::from),
            request_timeout,
            product_cache_ttl,
        })
    }
}

impl StorageConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            namespace: lookup("ROCKETSHOES_STORAGE_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            path: lookup("ROCKETSHOES_STORAGE_PATH").map(PathBuf::from),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a whole number of seconds.
fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "http://localhost:3333")]))
                .unwrap();

        assert_eq!(config.catalog.api_url.as_str(), "http://localhost:3333/");
        assert!(config.catalog.api_token.is_none());
        assert!(config.catalog.request_timeout.is_none());
        assert_eq!(config.catalog.product_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.storage.namespace, "@RocketShoes");
    }

    #[test]
    fn test_missing_api_url() {
        let err = CartConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ROCKETSHOES_API_URL"));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ROCKETSHOES_API_URL"));
    }

    #[test]
    fn test_all_values() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("ROCKETSHOES_API_URL", "https://api.example.com/v1/"),
            ("ROCKETSHOES_API_TOKEN", "tok_9f8e7d6c"),
            ("ROCKETSHOES_API_TIMEOUT_SECS", "15"),
            ("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", "60"),
            ("ROCKETSHOES_STORAGE_NAMESPACE", "@Test"),
            ("ROCKETSHOES_STORAGE_PATH", "/tmp/cart.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.catalog.api_token.as_ref().unwrap().expose_secret(),
            "tok_9f8e7d6c"
        );
        assert_eq!(config.catalog.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.catalog.product_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.storage.namespace, "@Test");
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/cart.json")));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = CartConfig::from_lookup(lookup_from(&[
            ("ROCKETSHOES_API_URL", "http://localhost:3333"),
            ("ROCKETSHOES_API_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ROCKETSHOES_API_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_catalog_config_debug_redacts_token() {
        let mut config = CatalogConfig::new(Url::parse("http://localhost:3333").unwrap());
        config.api_token = Some(SecretString::from("super_secret_api_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:3333"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_token"));
    }
}
