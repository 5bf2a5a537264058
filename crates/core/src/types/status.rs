//! Order lifecycle status as stored in the backend `orders.status` column.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order status.
///
/// Unknown values written by the back office deserialize as
/// [`OrderStatus::Unknown`] so a new status never breaks the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Message catalog key for the status label.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Pending => "order.status.pending",
            Self::Confirmed => "order.status.confirmed",
            Self::Preparing => "order.status.preparing",
            Self::Shipped => "order.status.shipped",
            Self::Delivered => "order.status.delivered",
            Self::Cancelled => "order.status.cancelled",
            Self::Unknown => "order.status.unknown",
        }
    }

    /// Whether the order can still change (polling stops once it can't).
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_fail() {
        let status: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn final_statuses() {
        assert!(OrderStatus::Delivered.is_final());
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Shipped.is_final());
        assert_eq!(serde_json::to_string(&OrderStatus::Preparing).unwrap(), "\"preparing\"");
    }
}
