//! Store contact details.

use tracing::instrument;

use crate::backend::{BackendClient, BackendError, Direction, Query};
use crate::models::ContactInfo;

const TABLE: &str = "contact_info";

/// Read access to the `contact_info` table.
pub struct ContactService<'a> {
    backend: &'a BackendClient,
}

impl<'a> ContactService<'a> {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// The store's contact details (first `contact_info` row).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the table is empty, or the
    /// backend error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_contact_info(&self) -> Result<ContactInfo, BackendError> {
        let query = Query::new().order("id", Direction::Asc);
        self.backend
            .select_first(TABLE, &query, None)
            .await?
            .ok_or_else(|| BackendError::NotFound("contact info".to_string()))
    }
}

/// Click-to-chat link for a `WhatsApp` number.
///
/// Everything but digits is stripped from `number`; an empty `message`
/// leaves out the prefilled text.
///
/// # Example
///
/// ```
/// use vitrine_storefront::services::whatsapp_url;
///
/// assert_eq!(
///     whatsapp_url("+54 9 11 5555-0101", "Hola!"),
///     "https://wa.me/5491155550101?text=Hola%21"
/// );
/// ```
#[must_use]
pub fn whatsapp_url(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let message = message.trim();
    if message.is_empty() {
        format!("https://wa.me/{digits}")
    } else {
        format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_url_without_message() {
        assert_eq!(whatsapp_url("(555) 010-2030", "  "), "https://wa.me/5550102030");
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        assert_eq!(
            whatsapp_url("5550102030", "Order #1001 & more"),
            "https://wa.me/5550102030?text=Order%20%231001%20%26%20more"
        );
    }
}
