//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::i18n::Messages;
use crate::routes::layout::Layout;
use crate::routes::offers::{OfferView, live_offers};
use crate::routes::products::ProductCard;
use crate::services::{ProductService, SettingsService};
use crate::state::AppState;

/// Settings key of the banner shown above the home page.
pub const ANNOUNCEMENT_SETTING: &str = "announcement";

/// Settings key toggling the offers section on the home page.
pub const SHOW_OFFERS_SETTING: &str = "show_offers";

/// Products shown on the home page.
const FEATURED_PRODUCTS: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub announcement: Option<String>,
    pub show_offers: bool,
    pub i18n: Messages,
    pub offers: Vec<OfferView>,
    pub refetch_secs: u64,
    pub products: Vec<ProductCard>,
}

/// Home page: announcement, live offers, featured products.
#[instrument(skip(state, layout))]
pub async fn home(State(state): State<AppState>, layout: Layout) -> Result<HomeTemplate> {
    let settings = SettingsService::new(state.backend());
    let announcement = settings
        .get_setting(ANNOUNCEMENT_SETTING)
        .await
        .filter(|text| !text.trim().is_empty());
    let show_offers = settings.get_flag(SHOW_OFFERS_SETTING, true).await;

    let offers = if show_offers {
        live_offers(&state, &layout.i18n).await?
    } else {
        Vec::new()
    };

    let products = ProductService::new(state.backend()).list(None).await?;

    Ok(HomeTemplate {
        announcement,
        show_offers,
        i18n: layout.i18n.clone(),
        offers,
        refetch_secs: layout.refetch_secs,
        products: products
            .iter()
            .take(FEATURED_PRODUCTS)
            .map(|p| ProductCard::new(p, &layout))
            .collect(),
        layout,
    })
}
