//! Account route handlers (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::layout::Layout;
use crate::services::AccountService;
use crate::state::AppState;

/// Account overview page.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub layout: Layout,
    pub user: CurrentUser,
    /// Message key of the user's pricing tier.
    pub user_type_key: String,
}

/// Deletion confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "account/delete.html")]
pub struct DeleteAccountTemplate {
    pub layout: Layout,
}

/// Account overview.
pub async fn index(layout: Layout, RequireAuth(user): RequireAuth) -> AccountTemplate {
    AccountTemplate {
        user_type_key: format!("account.user_type.{}", user.user_type.as_str()),
        user,
        layout,
    }
}

/// Ask for confirmation before deleting.
pub async fn delete_page(layout: Layout, RequireAuth(_user): RequireAuth) -> DeleteAccountTemplate {
    DeleteAccountTemplate { layout }
}

/// Delete the account, then end the session entirely.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    AccountService::new(state.backend())
        .delete_account(&user.access_token)
        .await?;

    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/").into_response())
}
