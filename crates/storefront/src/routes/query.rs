//! Catalog filter state carried in the URL query string.
//!
//! ```text
//! /products?category=Bombas&category=Filtros&brand=Parker&q=x200&tab=marca&product=17
//! ```
//!
//! `category` and `brand` repeat, one pair per selected value. Unknown keys
//! are ignored and an unknown `tab` falls back to the default tab, so a
//! hand-edited or stale URL always renders something.

use chavoya_core::{CatalogAction, CatalogState, FilterSelection, FilterTab, ProductId};
use url::form_urlencoded;

/// Page for full navigations.
pub const PAGE_PATH: &str = "/products";

/// HTMX fragment holding filters and grid.
pub const FRAGMENT_PATH: &str = "/products/catalog";

/// Filter selection and open product, as read from or written to a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub selection: FilterSelection,
    pub product: Option<ProductId>,
}

impl CatalogQuery {
    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "category" => {
                    query.selection.categories.insert(value.into_owned());
                }
                "brand" => {
                    query.selection.brands.insert(value.into_owned());
                }
                "q" => query.selection.set_search_term(value.into_owned()),
                "tab" => query
                    .selection
                    .set_active_tab(value.parse().unwrap_or_default()),
                "product" if !value.is_empty() => {
                    query.product = Some(ProductId::new(value.into_owned()));
                }
                _ => {}
            }
        }

        query
    }

    /// Capture the URL-relevant parts of a catalog state.
    #[must_use]
    pub fn from_state(state: &CatalogState) -> Self {
        Self {
            selection: state.selection().clone(),
            product: state.selected_id().cloned(),
        }
    }

    /// Same filters, no open product.
    #[must_use]
    pub fn without_product(&self) -> Self {
        Self {
            selection: self.selection.clone(),
            product: None,
        }
    }

    /// Encode as a query string. Defaults are omitted, so an untouched page
    /// encodes to the empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for category in &self.selection.categories {
            serializer.append_pair("category", category);
        }
        for brand in &self.selection.brands {
            serializer.append_pair("brand", brand);
        }
        if !self.selection.search_term.is_empty() {
            serializer.append_pair("q", &self.selection.search_term);
        }
        if self.selection.active_tab != FilterTab::default() {
            serializer.append_pair("tab", self.selection.active_tab.slug());
        }
        if let Some(product) = &self.product {
            serializer.append_pair("product", product.as_str());
        }

        serializer.finish()
    }

    /// `path` with this query appended.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Where a control leads: the full page (for `href` and history) and the
/// fragment HTMX swaps in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub page: String,
    pub fragment: String,
}

impl Link {
    #[must_use]
    pub fn to(query: &CatalogQuery) -> Self {
        Self {
            page: query.url(PAGE_PATH),
            fragment: query.url(FRAGMENT_PATH),
        }
    }

    /// Link to the state reached by applying `action` to `state`.
    #[must_use]
    pub fn after(state: &CatalogState, action: CatalogAction) -> Self {
        Self::to(&CatalogQuery::from_state(&state.applied(action)))
    }
}
