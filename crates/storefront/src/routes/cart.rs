//! Cart route handlers.
//!
//! The cart lives in the session (see [`vitrine_core::Cart`]); product rows
//! are re-read on every render so names and prices are always current.
//! Cart operations use HTMX for dynamic updates without full page reloads.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Cart, CartError, Price, ProductId, VariantSelection};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::i18n::Messages;
use crate::middleware::RequireAuth;
use crate::models::{Product, session_keys};
use crate::routes::layout::Layout;
use crate::routes::products::VARIANT_FIELD_PREFIX;
use crate::services::{CheckoutError, OrderService, ProductService};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub key: String,
    pub product_id: ProductId,
    pub name: String,
    pub variant_label: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Price the cart's lines for the visitor. Lines without a product row are
    /// skipped.
    #[must_use]
    pub fn new(cart: &Cart, products: &[Product], layout: &Layout) -> Self {
        let (language, fallback) = (layout.language(), layout.fallback());
        let mut subtotal = Price::zero(layout.currency);

        let lines = cart
            .lines()
            .iter()
            .filter_map(|line| {
                let product = products.iter().find(|p| p.id == line.product_id)?;
                let unit = product.price_for(layout.user_type(), layout.currency);
                let total = unit.times(line.quantity);
                subtotal.amount += total.amount;
                Some(CartLineView {
                    key: line.key(),
                    product_id: product.id,
                    name: product.name.resolve(language, fallback).to_string(),
                    variant_label: product
                        .variants
                        .render_label(&line.variant, language, fallback),
                    image_url: product.image_url.clone(),
                    quantity: line.quantity,
                    unit_price: unit.display(),
                    line_total: total.display(),
                })
            })
            .collect();

        Self {
            lines,
            subtotal: subtotal.display(),
            item_count: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session (empty if none).
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Load the cart and the active products it references, dropping lines
/// whose product is gone or no longer sold.
async fn load_priced_cart(state: &AppState, session: &Session) -> Result<(Cart, Vec<Product>)> {
    let mut cart = load_cart(session).await;
    if cart.is_empty() {
        return Ok((cart, Vec::new()));
    }

    let products = ProductService::new(state.backend())
        .get_many(&cart.product_ids())
        .await?;

    let sellable: Vec<ProductId> = products.iter().filter(|p| p.active).map(|p| p.id).collect();
    let before = cart.lines().len();
    cart.retain_products(&sellable);
    if cart.lines().len() != before {
        tracing::info!(removed = before - cart.lines().len(), "Dropped unavailable cart lines");
        save_cart(session, &cart).await?;
    }

    Ok((cart, products))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Variant choices arrive as `opt_<attribute>` fields; empty choices are
/// ignored.
#[derive(Debug, PartialEq, Eq)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    pub variant: VariantSelection,
}

impl AddToCartForm {
    /// Parse raw form fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if `product_id` is missing or a
    /// number is malformed.
    pub fn parse(fields: &[(String, String)]) -> Result<Self> {
        let mut product_id = None;
        let mut quantity = 1;
        let mut variant = VariantSelection::new();

        for (name, value) in fields {
            match name.as_str() {
                "product_id" => {
                    product_id = Some(value.parse::<ProductId>().map_err(|_| {
                        AppError::BadRequest(format!("invalid product_id: {value}"))
                    })?);
                }
                "quantity" if !value.trim().is_empty() => {
                    quantity = value.trim().parse::<u32>().map_err(|_| {
                        AppError::BadRequest(format!("invalid quantity: {value}"))
                    })?;
                }
                _ => {
                    if let Some(attribute) = name.strip_prefix(VARIANT_FIELD_PREFIX) {
                        variant.insert(attribute, value.trim());
                    }
                }
            }
        }

        Ok(Self {
            product_id: product_id
                .ok_or_else(|| AppError::BadRequest("missing product_id".to_string()))?,
            quantity,
            variant,
        })
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_key: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_key: String,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub notes: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub i18n: Messages,
    pub cart: CartView,
    pub error: Option<String>,
    pub signed_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub i18n: Messages,
    pub cart: CartView,
    pub error: Option<String>,
    pub signed_in: bool,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Inline error shown next to the add-to-cart button.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_feedback.html")]
pub struct CartFeedbackTemplate {
    pub message: String,
}

/// Message key for a rejected cart change.
const fn cart_error_key(err: &CartError) -> &'static str {
    match err {
        CartError::Variant(_) => "cart.invalid_variant",
        CartError::QuantityTooLarge => "cart.too_many",
        CartError::LineNotFound(_) => "cart.error",
    }
}

/// Re-render the cart items fragment, with an HX-Trigger for the badge.
async fn items_fragment(
    state: &AppState,
    session: &Session,
    layout: &Layout,
    error: Option<String>,
) -> Result<Response> {
    let (cart, products) = load_priced_cart(state, session).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            i18n: layout.i18n.clone(),
            cart: CartView::new(&cart, &products, layout),
            error,
            signed_in: layout.user.is_some(),
        },
    )
        .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session, layout))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
) -> Result<CartShowTemplate> {
    let (cart, products) = load_priced_cart(&state, &session).await?;

    Ok(CartShowTemplate {
        i18n: layout.i18n.clone(),
        cart: CartView::new(&cart, &products, &layout),
        error: None,
        signed_in: layout.user.is_some(),
        layout,
    })
}

/// Add item to cart (HTMX).
///
/// Returns the count badge and an HX-Trigger so other fragments refresh. A
/// rejected selection is retargeted to the form's feedback slot.
#[instrument(skip(state, session, layout, fields))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = AddToCartForm::parse(&fields)?;
    let product = ProductService::new(state.backend())
        .get(form.product_id)
        .await?;
    if !product.active {
        return Err(AppError::BadRequest(format!(
            "product {} is not available",
            product.id
        )));
    }

    let mut cart = load_cart(&session).await;
    if let Err(e) = cart.add(product.id, &product.variants, form.variant, form.quantity) {
        tracing::info!(product_id = %product.id, error = %e, "Add to cart rejected");
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            AppendHeaders([("HX-Retarget", "#cart-feedback"), ("HX-Reswap", "innerHTML")]),
            CartFeedbackTemplate {
                message: layout.i18n.t(cart_error_key(&e)).to_string(),
            },
        )
            .into_response());
    }
    save_cart(&session, &cart).await?;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.total_quantity(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX). Zero removes the line.
#[instrument(skip(state, session, layout))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    let error = match cart.set_quantity(&form.line_key, form.quantity) {
        Ok(()) => {
            save_cart(&session, &cart).await?;
            None
        }
        Err(e) => {
            tracing::info!(error = %e, "Cart update rejected");
            Some(layout.i18n.t(cart_error_key(&e)).to_string())
        }
    };

    items_fragment(&state, &session, &layout, error).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session, layout))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    match cart.remove(&form.line_key) {
        Ok(()) => save_cart(&session, &cart).await?,
        // Already gone (double click); just re-render
        Err(e) => tracing::debug!(error = %e, "Remove of unknown cart line"),
    }

    items_fragment(&state, &session, &layout, None).await
}

/// Get cart count badge (HTMX).
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.total_quantity(),
    }
}

/// Place an order for the cart and show it.
#[instrument(skip(state, session, layout, user, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await;

    let order = match OrderService::new(state.backend())
        .place(
            &user,
            &cart,
            &state.config().brand,
            layout.language(),
            form.notes,
        )
        .await
    {
        Ok(order) => order,
        Err(CheckoutError::EmptyCart) => return Ok(Redirect::to("/cart").into_response()),
        Err(e) => return Err(e.into()),
    };

    save_cart(&session, &Cart::new()).await?;
    let order_number = order.order_number.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_number", order_number.as_str())]));

    Ok(Redirect::to(&format!("/orders/{}?placed=1", order.order_number)).into_response())
}
