//! Store settings (`settings` key/value table).
//!
//! Settings are optional by nature: a missing row, a null value and a failed
//! request all read as "not set", and the failure is logged.

use tracing::{instrument, warn};

use crate::backend::{BackendClient, Query};
use crate::models::Setting;

const TABLE: &str = "settings";

/// Read access to the `settings` table.
pub struct SettingsService<'a> {
    backend: &'a BackendClient,
}

impl<'a> SettingsService<'a> {
    /// Create a new settings service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Value of the setting `key`, or `None` if unset or unreadable.
    #[instrument(skip(self))]
    pub async fn get_setting(&self, key: &str) -> Option<String> {
        let query = Query::new().select("key,value").eq("key", key);
        match self.backend.select_first::<Setting>(TABLE, &query, None).await {
            Ok(row) => row.and_then(|setting| setting.value),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read setting");
                None
            }
        }
    }

    /// Boolean setting; `default` when unset or not a recognizable boolean.
    pub async fn get_flag(&self, key: &str, default: bool) -> bool {
        self.get_setting(key)
            .await
            .and_then(|value| parse_flag(&value))
            .unwrap_or(default)
    }
}

/// Parse a boolean setting value.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
