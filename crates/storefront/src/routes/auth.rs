//! Authentication route handlers.
//!
//! Password sign-in and sign-up go through the backend's auth service. The
//! returned access token is kept in the session with the user so user-scoped
//! tables (orders, profiles) are read under row-level security.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Email, UserType};

use crate::backend::{AuthSession, BackendError, SignUpOutcome};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::layout::Layout;
use crate::services::ProfileService;
use crate::state::AppState;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Query parameters for error/notice display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

/// Message key for an error code carried in the query string.
fn error_message_key(code: &str) -> &'static str {
    match code {
        "credentials" => "auth.invalid_credentials",
        "email" => "auth.invalid_email",
        "password" => "auth.password_too_short",
        "taken" => "auth.email_taken",
        _ => "auth.error",
    }
}

/// Message key for a notice code carried in the query string.
fn notice_message_key(code: &str) -> Option<&'static str> {
    match code {
        "confirm" => Some("auth.check_email"),
        _ => None,
    }
}

/// Build the session user from an auth session.
///
/// A failed profile lookup does not block sign-in; the user gets retail
/// pricing until the next sign-in.
async fn current_user(state: &AppState, email: Email, auth: AuthSession) -> CurrentUser {
    let user_type = match ProfileService::new(state.backend())
        .get_user_type(&auth.access_token, auth.user.id)
        .await
    {
        Ok(user_type) => user_type,
        Err(e) => {
            tracing::warn!(user_id = %auth.user.id, error = %e, "Failed to load profile");
            UserType::Retail
        }
    };

    CurrentUser {
        id: auth.user.id,
        full_name: auth.user.full_name().map(String::from),
        email,
        user_type,
        access_token: auth.access_token,
    }
}

/// Store the user in the session and tag Sentry with them.
async fn sign_in(session: &Session, user: &CurrentUser) -> Response {
    if let Err(e) = set_current_user(session, user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, user_type = %user.user_type.as_str(), "Signed in");
    Redirect::to("/account").into_response()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(layout: Layout, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query
        .error
        .map(|code| layout.i18n.t(error_message_key(&code)).to_string());
    let notice = query
        .notice
        .as_deref()
        .and_then(notice_message_key)
        .map(|key| layout.i18n.t(key).to_string());

    LoginTemplate {
        layout,
        error,
        notice,
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/auth/login?error=email").into_response();
    };
    let password = SecretString::from(form.password);

    match state
        .backend()
        .sign_in_with_password(&email, &password)
        .await
    {
        Ok(auth) => {
            let user = current_user(&state, email, auth).await;
            sign_in(&session, &user).await
        }
        Err(BackendError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/auth/login?error=backend").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(layout: Layout, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query
        .error
        .map(|code| layout.i18n.t(error_message_key(&code)).to_string());
    RegisterTemplate { layout, error }
}

/// Handle registration form submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/auth/register?error=email").into_response();
    };
    let password = SecretString::from(form.password);
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Redirect::to("/auth/register?error=password").into_response();
    }
    let full_name = form
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match state
        .backend()
        .sign_up(&email, &password, full_name)
        .await
    {
        Ok(SignUpOutcome::SignedIn(auth)) => {
            let user = current_user(&state, email, auth).await;
            sign_in(&session, &user).await
        }
        Ok(SignUpOutcome::ConfirmationRequired(user)) => {
            tracing::info!(user_id = %user.id, "Sign-up awaiting email confirmation");
            Redirect::to("/auth/login?notice=confirm").into_response()
        }
        Err(BackendError::Conflict(_)) => Redirect::to("/auth/register?error=taken").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Redirect::to("/auth/register?error=backend").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out: revoke the backend session and forget the user.
///
/// The cart and language choice survive sign-out.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(crate::models::session_keys::CURRENT_USER)
        .await
    {
        if let Err(e) = state.backend().sign_out(&user.access_token).await {
            tracing::warn!("Backend sign-out failed: {e}");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
