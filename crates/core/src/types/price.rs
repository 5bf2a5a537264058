//! Prices and the retail/wholesale price split.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes a brand can sell in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    MXN,
    BRL,
    ARS,
}

impl CurrencyCode {
    /// Currency symbol used when rendering prices.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD | Self::MXN | Self::ARS => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::BRL => "R$",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::MXN => "MXN",
            Self::BRL => "BRL",
            Self::ARS => "ARS",
        }
    }
}

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "MXN" => Ok(Self::MXN),
            "BRL" => Ok(Self::BRL),
            "ARS" => Ok(Self::ARS),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// Kind of customer account, stored on the user's profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Regular customer paying retail prices.
    #[default]
    Retail,
    /// Reseller account eligible for wholesale prices.
    Wholesale,
}

impl UserType {
    /// Parse the profile column value. Anything unrecognised is retail.
    #[must_use]
    pub fn from_profile_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("wholesale") {
            Self::Wholesale
        } else {
            Self::Retail
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
        }
    }
}

/// Pick the price a user pays.
///
/// Wholesale users pay the wholesale price when the product has one; every
/// other case pays retail.
///
/// ```
/// use rust_decimal::Decimal;
/// use vitrine_core::{CurrencyCode, Price, UserType, select_price};
///
/// let retail = Price::new(Decimal::new(1000, 2), CurrencyCode::USD);
/// let wholesale = Price::new(Decimal::new(800, 2), CurrencyCode::USD);
///
/// assert_eq!(select_price(UserType::Wholesale, retail, Some(wholesale)), wholesale);
/// assert_eq!(select_price(UserType::Wholesale, retail, None), retail);
/// assert_eq!(select_price(UserType::Retail, retail, Some(wholesale)), retail);
/// ```
#[must_use]
pub const fn select_price(user_type: UserType, retail: Price, wholesale: Option<Price>) -> Price {
    match (user_type, wholesale) {
        (UserType::Wholesale, Some(price)) => price,
        _ => retail,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2), CurrencyCode::USD)
    }

    #[test]
    fn retail_user_ignores_wholesale_price() {
        assert_eq!(
            select_price(UserType::Retail, usd(1500), Some(usd(1100))),
            usd(1500)
        );
    }

    #[test]
    fn wholesale_user_without_wholesale_price_pays_retail() {
        assert_eq!(select_price(UserType::Wholesale, usd(1500), None), usd(1500));
    }

    #[test]
    fn wholesale_user_gets_wholesale_price() {
        assert_eq!(
            select_price(UserType::Wholesale, usd(1500), Some(usd(1100))),
            usd(1100)
        );
    }

    #[test]
    fn display_rounds_to_cents() {
        assert_eq!(usd(1999).display(), "$19.99");
        assert_eq!(Price::new(Decimal::new(5, 0), CurrencyCode::EUR).display(), "€5.00");
        assert_eq!(Price::new(Decimal::new(12345, 3), CurrencyCode::BRL).display(), "R$12.35");
    }

    #[test]
    fn times_multiplies_amount() {
        assert_eq!(usd(250).times(4), usd(1000));
        assert_eq!(usd(250).times(0), usd(0));
    }

    #[test]
    fn user_type_parsing_defaults_to_retail() {
        assert_eq!(UserType::from_profile_value("Wholesale"), UserType::Wholesale);
        assert_eq!(UserType::from_profile_value("retail"), UserType::Retail);
        assert_eq!(UserType::from_profile_value("vip"), UserType::Retail);
        let parsed: UserType = serde_json::from_str("\"wholesale\"").unwrap();
        assert_eq!(parsed, UserType::Wholesale);
    }

    #[test]
    fn currency_codes_parse_case_insensitively() {
        assert_eq!("mxn".parse::<CurrencyCode>().unwrap(), CurrencyCode::MXN);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
