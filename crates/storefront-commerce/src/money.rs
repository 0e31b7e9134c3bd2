//! Money type for representing monetary values.
//!
//! The commerce API sends prices as decimal strings (`"12.99"`). They are kept
//! as exact decimals so that `price * quantity` never picks up floating-point
//! error; rounding to two places only happens when an amount is displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use crate::error::CommerceError;

/// Number of decimal places shown to shoppers.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// A monetary amount in the store currency.
///
/// The store runs on a single currency, so no currency code travels with the
/// amount; presentation decides which symbol to print.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create a Money value from an exact decimal.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from minor units (cents).
    ///
    /// ```
    /// use storefront_commerce::money::Money;
    /// assert_eq!(Money::from_cents(4999).display_amount(), "49.99");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a wire price such as `"12.99"`.
    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| CommerceError::InvalidPrice(s.to_string()))
    }

    /// The exact amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Multiply by a quantity without losing precision.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Format for display with two decimal places (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }

    /// Format with a currency symbol prefix (e.g., "RM 49.99").
    pub fn display_with(&self, symbol: &str) -> String {
        format!("{} {}", symbol, self.display_amount())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_amount())
    }
}

impl FromStr for Money {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
