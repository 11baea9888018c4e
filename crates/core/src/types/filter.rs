//! Filter selection for the catalog page.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::Product;

/// Which filter control is on screen.
///
/// The tab only decides what is displayed. Filters chosen under another tab
/// keep constraining the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTab {
    #[default]
    Category,
    Brand,
    Name,
}

impl FilterTab {
    /// Tabs in display order.
    pub const ALL: [Self; 3] = [Self::Category, Self::Brand, Self::Name];

    /// Label shown on the tab button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Categoría",
            Self::Brand => "Marca",
            Self::Name => "Nombre",
        }
    }

    /// Identifier used in URLs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Category => "categoria",
            Self::Brand => "marca",
            Self::Name => "nombre",
        }
    }
}

impl fmt::Display for FilterTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error parsing a tab slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for FilterTab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// The user's current filter choices.
///
/// Empty sets and an empty search term mean "no filter on that axis".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub search_term: String,
    pub active_tab: FilterTab,
}

impl FilterSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, name: &str) {
        toggle(&mut self.categories, name);
    }

    /// Add the brand if absent, remove it if present.
    pub fn toggle_brand(&mut self, name: &str) {
        toggle(&mut self.brands, name);
    }

    /// Replace the search term verbatim.
    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
    }

    pub const fn set_active_tab(&mut self, tab: FilterTab) {
        self.active_tab = tab;
    }

    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains(name)
    }

    #[must_use]
    pub fn has_brand(&self, name: &str) -> bool {
        self.brands.contains(name)
    }

    /// Whether a product passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_category =
            self.categories.is_empty() || self.categories.contains(&product.category);
        let matches_brand = self.brands.is_empty() || self.brands.contains(&product.brand);
        let matches_search = self.search_term.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase());

        matches_category && matches_brand && matches_search
    }
}

fn toggle(set: &mut BTreeSet<String>, name: &str) {
    if !set.remove(name) {
        set.insert(name.to_string());
    }
}
