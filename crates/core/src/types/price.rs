//! Prices in Thai baht.
//!
//! The backend reports every amount (item price, line total, cart total,
//! order total) as a bare JSON number in baht. [`Price`] keeps those
//! amounts in decimal arithmetic and owns their display format.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol used for display.
pub const BAHT_SYMBOL: &str = "฿";

/// An amount of money in baht.
///
/// Deserializes from a JSON number (`45`, `52.5`) or a numeric string and
/// serializes back as a JSON number, matching what the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero baht.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display, e.g. `฿45` or `฿52.50`.
    ///
    /// Whole amounts drop their fractional part; anything else is shown
    /// with two decimal places.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        if rounded.fract().is_zero() {
            format!("{BAHT_SYMBOL}{}", rounded.trunc().normalize())
        } else {
            format!("{BAHT_SYMBOL}{rounded:.2}")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

impl FromStr for Price {
    type Err = PriceError;

    /// Parse a user-entered price. Only strictly positive amounts are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(BAHT_SYMBOL).trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_from_json_numbers() {
        let whole: Price = serde_json::from_str("45").unwrap();
        assert_eq!(whole.display(), "฿45");

        let fractional: Price = serde_json::from_str("52.5").unwrap();
        assert_eq!(fractional.display(), "฿52.50");
    }

    #[test]
    fn test_price_serializes_as_json_number() {
        let price: Price = "60".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "60.0");
    }

    #[test]
    fn test_price_times_quantity() {
        let price: Price = "45".parse().unwrap();
        assert_eq!(price.times(3).display(), "฿135");
    }

    #[test]
    fn test_price_parse_rejects_bad_input() {
        assert_eq!("".parse::<Price>(), Err(PriceError::Empty));
        assert_eq!("abc".parse::<Price>(), Err(PriceError::NotANumber));
        assert_eq!("0".parse::<Price>(), Err(PriceError::NotPositive));
        assert_eq!("-5".parse::<Price>(), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_price_parse_accepts_symbol() {
        let price: Price = "฿ 40".parse().unwrap();
        assert!(price.is_positive());
        assert_eq!(price.display(), "฿40");
    }
}
