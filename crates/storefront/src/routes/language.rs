//! Language switcher.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::Language;

use crate::error::{AppError, Result};
use crate::i18n::set_session_language;

/// Language form data.
#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub language: String,
    pub redirect: Option<String>,
}

/// Only same-site paths are followed after switching.
fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Store the chosen language and go back to the page.
#[instrument(skip(session))]
pub async fn switch(session: Session, Form(form): Form<LanguageForm>) -> Result<Response> {
    let language = Language::from_code(&form.language)
        .ok_or_else(|| AppError::BadRequest(format!("unsupported language: {}", form.language)))?;

    set_session_language(&session, language).await?;

    Ok(Redirect::to(safe_redirect(form.redirect.as_deref())).into_response())
}
