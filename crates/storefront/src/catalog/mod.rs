//! Catalog feed API client.
//!
//! # Architecture
//!
//! - Three read-only JSON feeds: categories, products, brands
//! - The feeds are fetched concurrently and accepted only as a unit: if any
//!   one fails, nothing is returned
//! - Successful loads are cached in memory via `moka` so that filter
//!   interactions reuse the same snapshot; failures are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use chavoya_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let data = client.load().await?;
//! println!("{} products", data.products.len());
//! ```

mod feed;

pub use feed::{Feed, is_truthy};

use std::sync::Arc;

use chavoya_core::{Brand, CatalogData, Category, Product, assign_missing_ids};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogApiConfig;

/// Errors that can occur when loading the catalog feeds.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status.
    #[error("{feed} feed returned HTTP {status}")]
    Status { feed: Feed, status: u16 },

    /// Feed body was not the expected JSON.
    #[error("{feed} feed parse error: {source}")]
    Parse {
        feed: Feed,
        #[source]
        source: serde_json::Error,
    },

    /// Feed envelope had no truthy `response` field.
    #[error("{0} feed returned no payload")]
    MissingPayload(Feed),

    /// A feed path could not be joined to the base URL.
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CatalogError {
    /// Whether the feed answered but with nothing to show, as opposed to a
    /// transport or format failure.
    #[must_use]
    pub const fn is_missing_payload(&self) -> bool {
        matches!(self, Self::MissingPayload(_))
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog feed API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    categories_url: Url,
    products_url: Url,
    brands_url: Url,
    api_token: Option<SecretString>,
    cache: Cache<(), CatalogData>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if a feed path cannot be joined to
    /// the base URL, or `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                categories_url: config.base_url.join(&config.categories_path)?,
                products_url: config.base_url.join(&config.products_path)?,
                brands_url: config.base_url.join(&config.brands_path)?,
                api_token: config.api_token.clone(),
                cache,
            }),
        })
    }

    /// Load all three feeds, from cache when a recent load succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` among the three feeds. No partial
    /// data is ever returned.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<CatalogData, CatalogError> {
        if let Some(data) = self.inner.cache.get(&()).await {
            debug!("Cache hit for catalog");
            return Ok(data);
        }

        let data = self.fetch().await?;
        self.inner.cache.insert((), data.clone()).await;
        Ok(data)
    }

    /// Fetch the three feeds concurrently, bypassing the cache.
    async fn fetch(&self) -> Result<CatalogData, CatalogError> {
        let (categories, products, brands) = tokio::join!(
            self.fetch_feed::<Category>(Feed::Categories),
            self.fetch_feed::<Product>(Feed::Products),
            self.fetch_feed::<Brand>(Feed::Brands),
        );

        let categories = categories?;
        let brands = brands?;
        let mut products = products?;
        assign_missing_ids(&mut products);

        let data = CatalogData {
            categories,
            brands,
            products,
        };

        debug!(
            categories = data.categories.len(),
            brands = data.brands.len(),
            products = data.products.len(),
            "Catalog feeds loaded"
        );
        Ok(data)
    }

    async fn fetch_feed<T: DeserializeOwned>(&self, feed: Feed) -> Result<Vec<T>, CatalogError> {
        let url = self.url(feed);

        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                feed = %feed,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog feed returned non-success status"
            );
            return Err(CatalogError::Status {
                feed,
                status: status.as_u16(),
            });
        }

        feed::decode(feed, &body)
    }

    fn url(&self, feed: Feed) -> &Url {
        match feed {
            Feed::Categories => &self.inner.categories_url,
            Feed::Products => &self.inner.products_url,
            Feed::Brands => &self.inner.brands_url,
        }
    }
}
