//! Application state shared across handlers.

use std::sync::Arc;

use chavoya_core::parallax::ParallaxHero;
use chavoya_core::quote::{DEFAULT_TEMPLATE, QuoteLink};

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the feed client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    quote: QuoteLink,
    hero: ParallaxHero,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built from the
    /// configured feed URLs.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let quote = QuoteLink::new(&config.quote_phone, DEFAULT_TEMPLATE);
        let hero = ParallaxHero::new(
            config.hero.image_url.clone(),
            config.hero.heading.clone(),
            config.hero.subheading.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                quote,
                hero,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog feed client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the quote link builder.
    #[must_use]
    pub fn quote(&self) -> &QuoteLink {
        &self.inner.quote
    }

    /// Get a reference to the parallax hero.
    #[must_use]
    pub fn hero(&self) -> &ParallaxHero {
        &self.inner.hero
    }
}
