//! Order history route handlers (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;
use vitrine_core::{OrderNumber, OrderStatus, Price};

use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::Messages;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::routes::layout::Layout;
use crate::services::OrderService;
use crate::state::AppState;

/// Order line display data.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub name: String,
    pub variant_label: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Order display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub number: OrderNumber,
    pub created_at: String,
    pub status: OrderStatus,
    pub total: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            number: order.order_number,
            created_at: order.created_at.to_rfc3339(),
            status: order.status,
            total: order.total_price().display(),
            notes: order.notes.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    name: item.name.clone(),
                    variant_label: item.variant_label.clone(),
                    quantity: item.quantity,
                    unit_price: Price::new(item.unit_price, order.currency).display(),
                    line_total: Price::new(item.line_total(), order.currency).display(),
                })
                .collect(),
        }
    }
}

/// Order history page.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
}

/// Order detail page. Includes the status fragment.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub i18n: Messages,
    pub order: OrderView,
    pub number: OrderNumber,
    pub status: OrderStatus,
    pub refetch_secs: u64,
    pub placed: bool,
}

/// Order status badge, polled until the status is final.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_status.html")]
pub struct OrderStatusTemplate {
    pub i18n: Messages,
    pub number: OrderNumber,
    pub status: OrderStatus,
    pub refetch_secs: u64,
}

/// Query flag set by the checkout redirect.
#[derive(Debug, Deserialize)]
pub struct PlacedQuery {
    pub placed: Option<u8>,
}

fn parse_number(raw: &str) -> Result<OrderNumber> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("order {raw}")))
}

/// List the user's orders.
#[instrument(skip(state, layout, user))]
pub async fn index(
    State(state): State<AppState>,
    layout: Layout,
    RequireAuth(user): RequireAuth,
) -> Result<OrdersIndexTemplate> {
    let orders = OrderService::new(state.backend())
        .list_for_user(&user)
        .await?;

    Ok(OrdersIndexTemplate {
        layout,
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Show one order.
#[instrument(skip(state, layout, user))]
pub async fn show(
    State(state): State<AppState>,
    layout: Layout,
    RequireAuth(user): RequireAuth,
    Path(number): Path<String>,
    Query(query): Query<PlacedQuery>,
) -> Result<OrderShowTemplate> {
    let number = parse_number(&number)?;
    let order = OrderService::new(state.backend())
        .get_by_number(&user, number)
        .await?;

    Ok(OrderShowTemplate {
        i18n: layout.i18n.clone(),
        number: order.order_number,
        status: order.status,
        order: OrderView::from(&order),
        refetch_secs: layout.refetch_secs,
        placed: query.placed.is_some(),
        layout,
    })
}

/// Status fragment of one order (polled).
#[instrument(skip(state, layout, user))]
pub async fn status(
    State(state): State<AppState>,
    layout: Layout,
    RequireAuth(user): RequireAuth,
    Path(number): Path<String>,
) -> Result<OrderStatusTemplate> {
    let number = parse_number(&number)?;
    let status = OrderService::new(state.backend())
        .status(&user, number)
        .await?;

    Ok(OrderStatusTemplate {
        i18n: layout.i18n,
        number,
        status,
        refetch_secs: layout.refetch_secs,
    })
}
