//! Core types for the Chavoya catalog.
//!
//! This module provides the records delivered by the catalog feeds and the
//! filter selection applied to them.

pub mod catalog;
pub mod filter;
pub mod id;
pub mod price;

pub use catalog::{Brand, Category, Product, assign_missing_ids};
pub use filter::{FilterSelection, FilterTab, UnknownTab};
pub use id::{LooseText, ProductId};
pub use price::{PRICE_UNAVAILABLE, Price};
