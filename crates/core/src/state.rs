//! Catalog page state and its reducer.
//!
//! Every change to the catalog page is a [`CatalogAction`] applied to a
//! [`CatalogState`]. The visible product list is never stored; it is derived
//! from the raw lists and the filter selection each time it is read.
//!
//! ```rust
//! use chavoya_core::{CatalogAction, CatalogData, CatalogState, Product};
//!
//! let mut state = CatalogState::new();
//! state.apply(CatalogAction::Loaded(CatalogData {
//!     products: vec![
//!         Product::new("1", "Valve A", "Valves", "Acme"),
//!         Product::new("2", "Pump B", "Pumps", "Acme"),
//!     ],
//!     ..CatalogData::default()
//! }));
//! state.apply(CatalogAction::ToggleCategory("Valves".to_string()));
//!
//! let names: Vec<_> = state.visible_products().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["Valve A"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Brand, Category, FilterSelection, FilterTab, Product, ProductId};

/// The three feeds, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub products: Vec<Product>,
}

/// Outcome of the one-time feed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// Something the user or the loader did to the catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    LoadStarted,
    Loaded(CatalogData),
    LoadFailed,
    ToggleCategory(String),
    ToggleBrand(String),
    SetSearchTerm(String),
    SetActiveTab(FilterTab),
    SelectProduct(ProductId),
    ClearSelection,
}

/// State of one catalog page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    categories: Vec<Category>,
    brands: Vec<Brand>,
    products: Vec<Product>,
    loading: bool,
    status: LoadStatus,
    selection: FilterSelection,
    selected: Option<ProductId>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    /// Empty lists, waiting for the feeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            brands: Vec::new(),
            products: Vec::new(),
            loading: true,
            status: LoadStatus::Pending,
            selection: FilterSelection::default(),
            selected: None,
        }
    }

    /// Start from an existing filter selection (e.g. one carried in a URL).
    #[must_use]
    pub fn with_selection(selection: FilterSelection) -> Self {
        Self {
            selection,
            ..Self::new()
        }
    }

    /// Apply an action.
    pub fn apply(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::LoadStarted => self.loading = true,
            CatalogAction::Loaded(data) => {
                // Lists are populated once per page view.
                if self.status != LoadStatus::Loaded {
                    self.categories = data.categories;
                    self.brands = data.brands;
                    self.products = data.products;
                    self.status = LoadStatus::Loaded;
                }
                self.loading = false;
            }
            CatalogAction::LoadFailed => {
                if self.status == LoadStatus::Pending {
                    self.status = LoadStatus::Failed;
                }
                self.loading = false;
            }
            CatalogAction::ToggleCategory(name) => self.selection.toggle_category(&name),
            CatalogAction::ToggleBrand(name) => self.selection.toggle_brand(&name),
            CatalogAction::SetSearchTerm(text) => self.selection.set_search_term(text),
            CatalogAction::SetActiveTab(tab) => self.selection.set_active_tab(tab),
            CatalogAction::SelectProduct(id) => {
                if self.products.iter().any(|product| product.id == id) {
                    self.selected = Some(id);
                }
            }
            CatalogAction::ClearSelection => self.selected = None,
        }
    }

    /// Apply an action to a copy, leaving `self` untouched.
    #[must_use]
    pub fn applied(&self, action: CatalogAction) -> Self {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    /// Products passing every active filter, in feed order.
    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(|product| self.selection.matches(product))
    }

    /// The product shown in the detail overlay, if any.
    #[must_use]
    pub fn selected_product(&self) -> Option<&Product> {
        let id = self.selected.as_ref()?;
        self.products.iter().find(|product| &product.id == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&ProductId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_data() -> CatalogData {
        CatalogData {
            categories: vec![Category::new("Valves"), Category::new("Pumps")],
            brands: vec![Brand::new("Acme"), Brand::new("Parker")],
            products: vec![
                Product::new("1", "Valve A", "Valves", "Acme"),
                Product::new("2", "Pump B", "Pumps", "Acme"),
                Product::new("3", "Bomba Industrial X200", "Pumps", "Parker"),
            ],
        }
    }

    fn loaded() -> CatalogState {
        let mut state = CatalogState::new();
        state.apply(CatalogAction::LoadStarted);
        state.apply(CatalogAction::Loaded(sample_data()));
        state
    }

    fn visible_names(state: &CatalogState) -> Vec<String> {
        state.visible_products().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_new_state_is_loading_and_empty() {
        let state = CatalogState::new();
        assert!(state.is_loading());
        assert!(state.products().is_empty());
        assert_eq!(state.status(), LoadStatus::Pending);
    }

    #[test]
    fn test_loaded_sets_all_lists() {
        let state = loaded();
        assert!(!state.is_loading());
        assert_eq!(state.categories().len(), 2);
        assert_eq!(state.brands().len(), 2);
        assert_eq!(state.products().len(), 3);
    }

    #[test]
    fn test_load_failed_leaves_lists_empty() {
        let mut state = CatalogState::new();
        state.apply(CatalogAction::LoadFailed);

        assert!(!state.is_loading());
        assert_eq!(state.status(), LoadStatus::Failed);
        assert!(state.categories().is_empty());
        assert!(state.brands().is_empty());
        assert_eq!(state.visible_products().count(), 0);
    }

    #[test]
    fn test_lists_are_not_replaced_after_load() {
        let mut state = loaded();
        state.apply(CatalogAction::Loaded(CatalogData::default()));
        state.apply(CatalogAction::LoadFailed);

        assert_eq!(state.products().len(), 3);
        assert_eq!(state.status(), LoadStatus::Loaded);
    }

    #[test]
    fn test_category_filter_scenario() {
        let mut state = CatalogState::new();
        state.apply(CatalogAction::Loaded(CatalogData {
            products: vec![
                Product::new("a", "Valve A", "Valves", "Acme"),
                Product::new("b", "Pump B", "Pumps", "Acme"),
            ],
            ..CatalogData::default()
        }));
        state.apply(CatalogAction::ToggleCategory("Valves".to_string()));

        assert_eq!(visible_names(&state), ["Valve A"]);
    }

    #[test]
    fn test_visible_products_subset_of_products() {
        let mut state = loaded();
        let actions = [
            CatalogAction::ToggleBrand("Acme".to_string()),
            CatalogAction::SetSearchTerm("p".to_string()),
            CatalogAction::ToggleCategory("Pumps".to_string()),
            CatalogAction::ToggleBrand("Acme".to_string()),
            CatalogAction::SetSearchTerm(String::new()),
        ];

        for action in actions {
            state.apply(action);
            for product in state.visible_products() {
                assert!(state.products().contains(product));
                assert!(state.selection().matches(product));
            }
            let hidden = state
                .products()
                .iter()
                .filter(|p| !state.selection().matches(p))
                .count();
            assert_eq!(state.visible_products().count() + hidden, 3);
        }
    }

    #[test]
    fn test_search_scenario() {
        let state = loaded().applied(CatalogAction::SetSearchTerm("bomba".to_string()));
        assert_eq!(visible_names(&state), ["Bomba Industrial X200"]);
    }

    #[test]
    fn test_switching_tabs_preserves_filters() {
        let mut state = loaded();
        state.apply(CatalogAction::ToggleBrand("Parker".to_string()));
        let before_visible = visible_names(&state);
        let before_selection = state.selection().clone();

        state.apply(CatalogAction::SetActiveTab(FilterTab::Name));

        assert_eq!(visible_names(&state), before_visible);
        assert_eq!(state.selection().brands, before_selection.brands);
        assert_eq!(state.selection().categories, before_selection.categories);
        assert_eq!(state.selection().active_tab, FilterTab::Name);
    }

    #[test]
    fn test_select_and_clear_product() {
        let mut state = loaded();
        state.apply(CatalogAction::SelectProduct(ProductId::new("2")));
        assert_eq!(state.selected_product().unwrap().name, "Pump B");

        state.apply(CatalogAction::ClearSelection);
        assert!(state.selected_product().is_none());
    }

    #[test]
    fn test_select_unknown_product_is_ignored() {
        let mut state = loaded();
        state.apply(CatalogAction::SelectProduct(ProductId::new("missing")));
        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_selection_survives_filtering_it_out() {
        let mut state = loaded();
        state.apply(CatalogAction::SelectProduct(ProductId::new("1")));
        state.apply(CatalogAction::ToggleCategory("Pumps".to_string()));

        assert_eq!(state.selected_product().unwrap().name, "Valve A");
    }

    #[test]
    fn test_applied_leaves_original_untouched() {
        let state = loaded();
        let next = state.applied(CatalogAction::ToggleCategory("Valves".to_string()));

        assert!(state.selection().categories.is_empty());
        assert!(next.selection().has_category("Valves"));
    }
}
