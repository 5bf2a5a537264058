//! Order tools for the active brand.
//!
//! Reads the storefront configuration (`.env` written by `brand select`) and
//! queries the brand's backend with its anon key. The orders table is
//! normally protected by row-level security, so the number shown is only
//! meaningful if the anon role may read `order_number`.

use vitrine_core::OrderNumber;
use vitrine_storefront::backend::BackendClient;
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::services::OrderService;

/// Order number the next checkout of the active brand would get.
///
/// # Errors
///
/// Returns an error if the configuration is missing or invalid, or the
/// backend request fails.
pub async fn next_number() -> Result<OrderNumber, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    tracing::info!(brand = %config.brand.id, "Querying latest order number");

    let backend = BackendClient::new(&config.backend, config.refetch_interval)?;
    let number = OrderService::new(&backend)
        .next_order_number(config.brand.order_number_start, None)
        .await?;

    Ok(number)
}
