//! Offer route handlers.
//!
//! The offers list is a polled fragment: the page embeds it once and the
//! fragment re-requests itself every refetch interval.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;
use vitrine_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::i18n::Messages;
use crate::models::Offer;
use crate::routes::layout::Layout;
use crate::services::OfferService;
use crate::state::AppState;

/// Offer display data.
#[derive(Debug, Clone)]
pub struct OfferView {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// e.g. "15% off"
    pub discount: Option<String>,
    /// e.g. "Until 2026-03-08"
    pub until: Option<String>,
    pub product_id: Option<ProductId>,
}

impl OfferView {
    /// Build the view in the request's language.
    #[must_use]
    pub fn new(offer: &Offer, i18n: &Messages) -> Self {
        let (language, fallback) = (i18n.language(), i18n.fallback());
        Self {
            title: offer.title.resolve(language, fallback).to_string(),
            description: offer.description.resolve(language, fallback).to_string(),
            image_url: offer.image_url.clone(),
            discount: offer.discount_percent.map(|percent| {
                i18n.format("offers.discount", &[("percent", &percent.normalize())])
            }),
            until: offer.ends_at.map(|end| {
                i18n.format("offers.until", &[("date", &end.format("%Y-%m-%d"))])
            }),
            product_id: offer.product_id,
        }
    }
}

/// Live offers fragment (polled).
#[derive(Template, WebTemplate)]
#[template(path = "partials/offers_feed.html")]
pub struct OffersFeedTemplate {
    pub i18n: Messages,
    pub offers: Vec<OfferView>,
    pub refetch_secs: u64,
}

/// Offers page. Includes the feed fragment, so it carries the same fields.
#[derive(Template, WebTemplate)]
#[template(path = "offers/index.html")]
pub struct OffersIndexTemplate {
    pub layout: Layout,
    pub i18n: Messages,
    pub offers: Vec<OfferView>,
    pub refetch_secs: u64,
}

/// Live offers in the request's language.
///
/// # Errors
///
/// Returns an error if the offers cannot be fetched.
pub async fn live_offers(state: &AppState, i18n: &Messages) -> Result<Vec<OfferView>> {
    let offers = OfferService::new(state.backend())
        .list_active(Utc::now())
        .await?;

    Ok(offers.iter().map(|offer| OfferView::new(offer, i18n)).collect())
}

/// Offers page.
#[instrument(skip(state, layout))]
pub async fn index(State(state): State<AppState>, layout: Layout) -> Result<OffersIndexTemplate> {
    let offers = live_offers(&state, &layout.i18n).await?;
    Ok(OffersIndexTemplate {
        i18n: layout.i18n.clone(),
        refetch_secs: layout.refetch_secs,
        offers,
        layout,
    })
}

/// Offers fragment, re-requested by the page every refetch interval.
#[instrument(skip(state, layout))]
pub async fn feed(State(state): State<AppState>, layout: Layout) -> Result<OffersFeedTemplate> {
    let offers = live_offers(&state, &layout.i18n).await?;
    Ok(OffersFeedTemplate {
        i18n: layout.i18n,
        offers,
        refetch_secs: layout.refetch_secs,
    })
}
