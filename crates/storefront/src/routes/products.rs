//! Product catalog route handlers.
//!
//! The catalog page is rendered in two steps, mirroring the page's loading
//! state:
//!
//! 1. `GET /products` renders the hero and a catalog shell with loading
//!    placeholders. The shell asks HTMX to fetch the fragment on load.
//! 2. `GET /products/catalog` loads the feeds, applies the load outcome to a
//!    [`CatalogState`] and renders filters, grid and (optionally) the detail
//!    overlay.
//!
//! Every control links to the state its action produces, so the same URLs
//! work with and without JavaScript. Links push their page URL with
//! `hx-push-url`; the search form cannot know its URL up front, so the
//! fragment answers it with an `HX-Replace-Url` header instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::IntoResponse,
};
use chavoya_core::quote::QuoteLink;
use chavoya_core::{CatalogAction, CatalogState, FilterTab, Product, ProductId};

use super::hero::HeroView;
use super::query::{CatalogQuery, Link, PAGE_PATH};
use crate::catalog::CatalogError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Placeholder rows while categories load.
const CATEGORY_PLACEHOLDERS: usize = 8;
/// Placeholder rows while brands load.
const BRAND_PLACEHOLDERS: usize = 15;
/// Skeleton cards while products load.
const PRODUCT_PLACEHOLDERS: usize = 15;

const DESCRIPTION_FALLBACK: &str = "Sin descripcion disponible";

// =============================================================================
// Views
// =============================================================================

/// A filter tab button.
#[derive(Clone)]
pub struct TabView {
    pub label: &'static str,
    pub active: bool,
    pub link: Link,
}

/// A category or brand checkbox.
#[derive(Clone)]
pub struct FilterOptionView {
    pub name: String,
    pub checked: bool,
    pub link: Link,
}

/// A hidden form field carrying filters that the search form does not edit.
#[derive(Clone)]
pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

/// Product card in the grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub image_url: String,
    pub quote_url: String,
    pub detail: Link,
    /// Quick-view fragment URL.
    pub quick_view_url: String,
}

/// Product detail overlay.
#[derive(Clone)]
pub struct ProductDetailView {
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub price: String,
    pub technical_sheet_url: Option<String>,
    pub dimensions: Option<String>,
    pub weight: Option<String>,
    pub quote_url: String,
    pub close: Link,
}

impl ProductDetailView {
    fn build(product: &Product, quote: &QuoteLink, close: Link) -> Self {
        let non_empty = |text: &str| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Self {
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            description: non_empty(&product.description)
                .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string()),
            price: product.price.display(),
            technical_sheet_url: non_empty(&product.technical_sheet_url),
            dimensions: non_empty(product.dimensions.as_str()),
            weight: non_empty(product.weight.as_str()),
            quote_url: quote.url_for(&product.name),
            close,
        }
    }
}

/// Everything the catalog fragment renders.
#[derive(Clone)]
pub struct CatalogView {
    pub loading: bool,
    pub tabs: Vec<TabView>,
    pub show_categories: bool,
    pub show_brands: bool,
    pub show_search: bool,
    pub categories: Vec<FilterOptionView>,
    pub brands: Vec<FilterOptionView>,
    pub search_term: String,
    pub search_fields: Vec<HiddenField>,
    pub products: Vec<ProductCardView>,
    pub detail: Option<ProductDetailView>,
    /// Fragment to request once the shell is on screen.
    pub fragment_url: String,
    pub category_placeholders: Vec<usize>,
    pub brand_placeholders: Vec<usize>,
    pub product_placeholders: Vec<usize>,
}

impl CatalogView {
    /// Build the view for `state`.
    ///
    /// `query` is what the request asked for. It differs from the state's own
    /// query only while loading, when a requested product cannot be resolved
    /// yet and must be passed on to the fragment request.
    pub fn build(state: &CatalogState, query: &CatalogQuery, quote: &QuoteLink) -> Self {
        let selection = state.selection();
        let current = CatalogQuery::from_state(state);

        let tabs = FilterTab::ALL
            .into_iter()
            .map(|tab| TabView {
                label: tab.label(),
                active: selection.active_tab == tab,
                link: Link::after(state, CatalogAction::SetActiveTab(tab)),
            })
            .collect();

        let categories = state
            .categories()
            .iter()
            .map(|category| FilterOptionView {
                name: category.name.clone(),
                checked: selection.has_category(&category.name),
                link: Link::after(state, CatalogAction::ToggleCategory(category.name.clone())),
            })
            .collect();

        let brands = state
            .brands()
            .iter()
            .map(|brand| FilterOptionView {
                name: brand.name.clone(),
                checked: selection.has_brand(&brand.name),
                link: Link::after(state, CatalogAction::ToggleBrand(brand.name.clone())),
            })
            .collect();

        let listing = current.without_product();
        let products = state
            .visible_products()
            .map(|product| ProductCardView {
                id: product.id.to_string(),
                name: product.name.clone(),
                brand: product.brand.clone(),
                image_url: product.image_url.clone(),
                quote_url: quote.url_for(&product.name),
                detail: Link::after(state, CatalogAction::SelectProduct(product.id.clone())),
                quick_view_url: listing.url(&quick_view_path(&product.id)),
            })
            .collect();

        let detail = state.selected_product().map(|product| {
            ProductDetailView::build(
                product,
                quote,
                Link::after(state, CatalogAction::ClearSelection),
            )
        });

        Self {
            loading: state.is_loading(),
            tabs,
            show_categories: selection.active_tab == FilterTab::Category,
            show_brands: selection.active_tab == FilterTab::Brand,
            show_search: selection.active_tab == FilterTab::Name,
            categories,
            brands,
            search_term: selection.search_term.clone(),
            search_fields: search_fields(&current),
            products,
            detail,
            fragment_url: Link::to(query).fragment,
            category_placeholders: (0..CATEGORY_PLACEHOLDERS).collect(),
            brand_placeholders: (0..BRAND_PLACEHOLDERS).collect(),
            product_placeholders: (0..PRODUCT_PLACEHOLDERS).collect(),
        }
    }
}

/// Hidden inputs that keep the other filters when the search form submits.
fn search_fields(query: &CatalogQuery) -> Vec<HiddenField> {
    let selection = &query.selection;
    let mut fields: Vec<HiddenField> = selection
        .categories
        .iter()
        .map(|name| HiddenField {
            name: "category",
            value: name.clone(),
        })
        .chain(selection.brands.iter().map(|name| HiddenField {
            name: "brand",
            value: name.clone(),
        }))
        .collect();

    fields.push(HiddenField {
        name: "tab",
        value: selection.active_tab.slug().to_string(),
    });
    fields
}

fn quick_view_path(id: &ProductId) -> String {
    format!("/products/{}/quick-view", urlencoding::encode(id.as_str()))
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub hero: HeroView,
    pub catalog: CatalogView,
}

/// Catalog fragment template (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogFragmentTemplate {
    pub catalog: CatalogView,
}

/// Product detail overlay fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_detail.html")]
pub struct ProductDetailTemplate {
    pub detail: ProductDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the catalog page in its loading state.
pub async fn index(State(state): State<AppState>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let query = CatalogQuery::parse(raw.as_deref());
    let catalog = CatalogState::with_selection(query.selection.clone());

    ProductsIndexTemplate {
        hero: HeroView::new(state.hero()),
        catalog: CatalogView::build(&catalog, &query, state.quote()),
    }
}

/// Element id of the search form, as sent back by HTMX in `HX-Trigger`.
pub const SEARCH_FORM_ID: &str = "catalog-search-form";

const HX_TRIGGER: &str = "hx-trigger";
const HX_REPLACE_URL: &str = "hx-replace-url";

/// Load the feeds and render filters, grid and detail overlay.
///
/// Load failures are logged and render as an empty catalog. Search requests
/// get the page URL of the searched state back in `HX-Replace-Url`.
pub async fn catalog(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let query = CatalogQuery::parse(raw.as_deref());
    let catalog = load_catalog(&state, &query).await;

    let replace_url = is_search_request(&headers)
        .then(|| [(HX_REPLACE_URL, CatalogQuery::from_state(&catalog).url(PAGE_PATH))]);

    (
        replace_url,
        CatalogFragmentTemplate {
            catalog: CatalogView::build(&catalog, &query, state.quote()),
        },
    )
}

fn is_search_request(headers: &HeaderMap) -> bool {
    headers
        .get(HX_TRIGGER)
        .is_some_and(|trigger| trigger.as_bytes() == SEARCH_FORM_ID.as_bytes())
}

/// Render the detail overlay for one product.
pub async fn quick_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ProductDetailTemplate> {
    let query = CatalogQuery::parse(raw.as_deref());
    let data = state.catalog().load().await?;

    let mut catalog = CatalogState::with_selection(query.selection);
    catalog.apply(CatalogAction::Loaded(data));
    catalog.apply(CatalogAction::SelectProduct(ProductId::new(id.as_str())));

    let product = catalog
        .selected_product()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    add_breadcrumb("catalog", "Opened product detail", Some(&[("product_id", &id)]));

    Ok(ProductDetailTemplate {
        detail: ProductDetailView::build(
            product,
            state.quote(),
            Link::after(&catalog, CatalogAction::ClearSelection),
        ),
    })
}

/// Run the one-time load for a page view and apply its outcome.
async fn load_catalog(state: &AppState, query: &CatalogQuery) -> CatalogState {
    let mut catalog = CatalogState::with_selection(query.selection.clone());
    catalog.apply(CatalogAction::LoadStarted);

    match state.catalog().load().await {
        Ok(data) => catalog.apply(CatalogAction::Loaded(data)),
        Err(e) => {
            log_load_failure(&e);
            catalog.apply(CatalogAction::LoadFailed);
        }
    }

    if let Some(id) = &query.product {
        catalog.apply(CatalogAction::SelectProduct(id.clone()));
    }

    catalog
}

fn log_load_failure(error: &CatalogError) {
    if error.is_missing_payload() {
        tracing::warn!(error = %error, "Catalog feeds returned no data");
    } else {
        tracing::error!(error = %error, "Failed to fetch catalog feeds");
    }
}
