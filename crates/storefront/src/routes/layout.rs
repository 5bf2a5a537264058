//! Per-request page chrome shared by every full-page template.

use axum::{
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use tower_sessions::Session;
use vitrine_core::{Cart, CurrencyCode, Language, UserType};

use crate::i18n::{Messages, resolve_language, session_language};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// One entry of the language picker.
#[derive(Debug, Clone)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Data every page needs: brand, language, signed-in user, cart badge.
#[derive(Debug, Clone)]
pub struct Layout {
    pub brand_name: String,
    pub i18n: Messages,
    pub languages: Vec<LanguageOption>,
    pub user: Option<CurrentUser>,
    pub cart_count: u32,
    pub currency: CurrencyCode,
    /// Polling interval for live fragments, in seconds.
    pub refetch_secs: u64,
    /// Path of the current page, for post-action redirects.
    pub path: String,
}

impl Layout {
    /// Language of this request.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.i18n.language()
    }

    /// Brand default language.
    #[must_use]
    pub const fn fallback(&self) -> Language {
        self.i18n.fallback()
    }

    /// Pricing tier of the visitor; guests see retail prices.
    #[must_use]
    pub fn user_type(&self) -> UserType {
        self.user
            .as_ref()
            .map_or(UserType::Retail, |user| user.user_type)
    }

    /// Name of the signed-in user, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(CurrentUser::display_name)
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned();

        let (chosen, user, cart) = match &session {
            Some(session) => (
                session_language(session).await,
                session
                    .get::<CurrentUser>(session_keys::CURRENT_USER)
                    .await
                    .ok()
                    .flatten(),
                session
                    .get::<Cart>(session_keys::CART)
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or_default(),
            ),
            None => (None, None, Cart::default()),
        };

        let config = state.config();
        let accept_language = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        let language = resolve_language(chosen, accept_language, config.brand.default_language);

        let languages = Language::ALL
            .iter()
            .map(|option| LanguageOption {
                code: option.code(),
                name: option.native_name(),
                selected: *option == language,
            })
            .collect();

        Ok(Self {
            brand_name: config.brand.name.clone(),
            i18n: state.messages(language),
            languages,
            user,
            cart_count: cart.total_quantity(),
            currency: config.brand.currency,
            refetch_secs: config.refetch_interval.as_secs().max(1),
            path: parts.uri.path().to_string(),
        })
    }
}
