//! Exact-decimal price representation.
//!
//! Prices are stored and summed as [`rust_decimal::Decimal`] so cart and
//! order totals never accumulate binary floating-point drift. The wire
//! format is a decimal string (via the `serde-with-str` feature of
//! `rust_decimal`); display rounds to two decimal places.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit or total price in the store's single display currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole currency units (e.g. `799` -> `799.00`).
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from minor currency units (e.g. `1999` cents -> `19.99`).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Subtotal for a line: unit price times quantity.
    ///
    /// Quantities are validated positive before they reach price
    /// arithmetic, so plain multiplication is exact.
    #[must_use]
    pub fn line_total(&self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    /// Formats at currency display precision (two decimal places).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_is_exact() {
        let unit = Price::from_cents(1999); // 19.99
        assert_eq!(unit.line_total(3), Price::from_cents(5997));
    }

    #[test]
    fn test_sum_has_no_drift() {
        // 0.10 summed ten times is exactly 1.00
        let total: Price = core::iter::repeat_n(Price::from_cents(10), 10).sum();
        assert_eq!(total, Price::from_major(1));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_major(799).to_string(), "799.00");
        assert_eq!(Price::from_cents(1050).to_string(), "10.50");
    }

    #[test]
    fn test_serde_string_wire_format() {
        let price = Price::from_cents(129_900);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1299.00\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
