//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to /products
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (catalog feeds reachable)
//! GET  /assets/hero.css               - Hero scroll keyframes
//!
//! # Products
//! GET  /products                      - Catalog page (hero + loading shell)
//! GET  /products/catalog              - Filters, grid and detail overlay (HTMX)
//! GET  /products/{id}/quick-view      - Detail overlay fragment (HTMX)
//! ```
//!
//! Filter state travels in the query string, see [`query`].

pub mod health;
pub mod hero;
pub mod products;
pub mod query;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/catalog", get(products::catalog))
        .route("/{id}/quick-view", get(products::quick_view))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The catalog is the whole site
        .route("/", get(|| async { Redirect::to(query::PAGE_PATH) }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/assets/hero.css", get(hero::stylesheet))
        .nest("/products", product_routes())
}
