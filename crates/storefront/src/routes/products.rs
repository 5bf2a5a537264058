//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;
use vitrine_core::{ProductId, UserType};

use crate::error::Result;
use crate::filters;
use crate::models::Product;
use crate::routes::layout::Layout;
use crate::services::ProductService;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product display data for listing cards.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Price for the visitor's pricing tier.
    pub price: String,
    /// Retail price, shown struck through when a lower tier price applies.
    pub retail_price: Option<String>,
}

impl ProductCard {
    /// Build a card in the layout's language and pricing tier.
    #[must_use]
    pub fn new(product: &Product, layout: &Layout) -> Self {
        let price = product.price_for(layout.user_type(), layout.currency);
        let retail = product.retail(layout.currency);
        Self {
            id: product.id,
            name: product
                .name
                .resolve(layout.language(), layout.fallback())
                .to_string(),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            price: price.display(),
            retail_price: (price != retail).then(|| retail.display()),
        }
    }
}

/// One variant attribute in the picker.
#[derive(Debug, Clone)]
pub struct VariantField {
    /// Form field name (`opt_<attribute>`).
    pub field: String,
    pub label: String,
    pub options: Vec<String>,
}

/// Category filter link.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub selected: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub categories: Vec<CategoryLink>,
    pub category: Option<String>,
}

/// Product detail page.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductCard,
    pub description: String,
    pub variants: Vec<VariantField>,
    pub available: bool,
    pub wholesale: bool,
}

/// Listing filter.
#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

/// Prefix of variant fields in the add-to-cart form.
pub const VARIANT_FIELD_PREFIX: &str = "opt_";

// =============================================================================
// Handlers
// =============================================================================

/// Product listing, optionally filtered by category.
#[instrument(skip(state, layout))]
pub async fn index(
    State(state): State<AppState>,
    layout: Layout,
    Query(filter): Query<ProductFilter>,
) -> Result<ProductsIndexTemplate> {
    let service = ProductService::new(state.backend());
    let category = filter.category.filter(|c| !c.trim().is_empty());

    // Categories come from the unfiltered list so the menu stays complete.
    let all = service.list(None).await?;
    let mut names: Vec<String> = all.iter().filter_map(|p| p.category.clone()).collect();
    names.sort();
    names.dedup();
    let categories = names
        .into_iter()
        .map(|name| CategoryLink {
            selected: category.as_deref() == Some(name.as_str()),
            name,
        })
        .collect();

    let products = match &category {
        Some(category) => service.list(Some(category)).await?,
        None => all,
    };

    Ok(ProductsIndexTemplate {
        products: products.iter().map(|p| ProductCard::new(p, &layout)).collect(),
        categories,
        category,
        layout,
    })
}

/// Product detail with variant picker.
#[instrument(skip(state, layout))]
pub async fn show(
    State(state): State<AppState>,
    layout: Layout,
    Path(id): Path<i64>,
) -> Result<ProductShowTemplate> {
    let product = ProductService::new(state.backend())
        .get(ProductId::new(id))
        .await?;

    let variants = product
        .variants
        .attributes()
        .iter()
        .map(|attribute| VariantField {
            field: format!("{VARIANT_FIELD_PREFIX}{}", attribute.name),
            label: attribute
                .display_label(layout.language(), layout.fallback())
                .to_string(),
            options: attribute.options.clone(),
        })
        .collect();

    Ok(ProductShowTemplate {
        product: ProductCard::new(&product, &layout),
        description: product
            .description
            .resolve(layout.language(), layout.fallback())
            .to_string(),
        variants,
        available: product.active,
        wholesale: layout.user_type() == UserType::Wholesale,
        layout,
    })
}
