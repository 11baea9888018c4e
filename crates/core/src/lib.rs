//! Chavoya Core - catalog types and page logic.
//!
//! This crate provides everything the catalog page computes, independent of
//! how it is served:
//! - the records delivered by the catalog feeds (categories, brands, products)
//! - the filter selection and the reducer that drives the catalog page
//! - scroll-progress tracking and the parallax curves of the hero banner
//! - WhatsApp quote links
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no rendering. The storefront crate fetches feeds, feeds the
//! results into [`state::CatalogState`] as actions, and renders what comes out.
//!
//! # Modules
//!
//! - [`types`] - Catalog records, prices and the filter selection
//! - [`state`] - Catalog state and its reducer
//! - [`parallax`] - Scroll progress and piecewise-linear transform curves
//! - [`quote`] - Quote link construction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod parallax;
pub mod quote;
pub mod state;
pub mod types;

pub use state::{CatalogAction, CatalogData, CatalogState, LoadStatus};
pub use types::*;
