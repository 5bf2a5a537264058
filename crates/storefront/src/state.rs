//! Application state shared across handlers.

use std::sync::Arc;

use vitrine_core::Language;

use crate::backend::{BackendClient, BackendError};
use crate::config::StorefrontConfig;
use crate::i18n::{Catalog, CatalogError, Messages};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("message catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client, message catalogs and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    catalog: Arc<Catalog>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built or an embedded
    /// message catalog is malformed.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let backend = BackendClient::new(&config.backend, config.refetch_interval)?;
        let catalog = Arc::new(Catalog::embedded()?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                catalog,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Messages for `language`, falling back to the brand default.
    #[must_use]
    pub fn messages(&self, language: Language) -> Messages {
        Messages::new(
            Arc::clone(&self.inner.catalog),
            language,
            self.inner.config.brand.default_language,
        )
    }
}
