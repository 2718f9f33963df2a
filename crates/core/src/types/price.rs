//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (dollars, not cents) as
//! `NUMERIC(12, 2)` and converted to minor units only at the payment boundary.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The amount was below zero.
    #[error("price cannot be negative")]
    Negative,

    /// The amount has more decimal places than cents.
    #[error("price cannot have more than 2 decimal places")]
    TooPrecise,

    /// The amount does not fit in `NUMERIC(12, 2)`.
    #[error("price must be less than 10000000000")]
    TooLarge,
}

/// Decimal places a listed price may carry.
const MAX_SCALE: u32 = 2;

/// Exclusive upper bound of a listed price.
const LISTING_LIMIT: i64 = 10_000_000_000;

/// A non-negative USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price a product can be listed at.
    ///
    /// On top of [`Price::new`], the amount must have at most two decimal
    /// places (trailing zeros ignored) and fewer than ten whole digits.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative`, `PriceError::TooPrecise`, or
    /// `PriceError::TooLarge`.
    pub fn listing(amount: Decimal) -> Result<Self, PriceError> {
        let price = Self::new(amount)?;
        let normalized = amount.normalize();
        if normalized.scale() > MAX_SCALE {
            return Err(PriceError::TooPrecise);
        }
        if normalized >= Decimal::from(LISTING_LIMIT) {
            return Err(PriceError::TooLarge);
        }
        Ok(price)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Convert to minor units (cents), rounding half away from zero.
    ///
    /// Returns `None` if the value does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        let cents = (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        i64::try_from(cents).ok()
    }

    /// Format for display, e.g. `$1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{rounded:.2}");
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let digits: Vec<char> = whole.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(*digit);
        }

        format!("${grouped}.{fraction}")
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
