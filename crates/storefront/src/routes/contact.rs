//! Contact page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::Result;
use crate::filters;
use crate::routes::layout::Layout;
use crate::services::{ContactService, whatsapp_url};
use crate::state::AppState;

/// Contact details display data.
#[derive(Debug, Clone)]
pub struct ContactView {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub whatsapp_url: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub instagram_url: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    /// `None` when the store has not entered contact details yet.
    pub contact: Option<ContactView>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Contact page.
#[instrument(skip(state, layout))]
pub async fn show(State(state): State<AppState>, layout: Layout) -> Result<ContactTemplate> {
    let info = match ContactService::new(state.backend()).get_contact_info().await {
        Ok(info) => Some(info),
        Err(BackendError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let contact = info.map(|info| {
        let greeting = layout
            .i18n
            .format("contact.whatsapp_message", &[("brand", &layout.brand_name)]);
        let hours = info
            .opening_hours
            .resolve(layout.language(), layout.fallback())
            .to_string();

        ContactView {
            phone: non_blank(info.phone.as_ref()),
            email: non_blank(info.email.as_ref()),
            whatsapp_url: non_blank(info.whatsapp.as_ref())
                .map(|number| whatsapp_url(&number, &greeting)),
            address: non_blank(info.address.as_ref()),
            opening_hours: Some(hours).filter(|h| !h.is_empty()),
            instagram_url: non_blank(info.instagram.as_ref()).map(|handle| {
                format!(
                    "https://instagram.com/{}",
                    handle.trim_start_matches('@')
                )
            }),
        }
    });

    Ok(ContactTemplate { layout, contact })
}
