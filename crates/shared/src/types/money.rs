//! Money amounts in minor currency units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are whole minor units (`i64`) so ledger sums are exact; the
//! currency itself is a display concern held in configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arithmetic failure on money amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The result does not fit in 64 bits.
    #[error("amount overflow")]
    Overflow,
}

/// A monetary amount in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Wraps an amount expressed in minor units.
    #[must_use]
    pub const fn from_minor(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0.checked_add(other.0).map(Self).ok_or(MoneyError::Overflow)
    }

    /// Subtracts `other` from this amount.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.0.checked_sub(other.0).map(Self).ok_or(MoneyError::Overflow)
    }

    /// Multiplies a unit price by a quantity.
    pub fn checked_mul(self, quantity: i64) -> Result<Self, MoneyError> {
        self.0.checked_mul(quantity).map(Self).ok_or(MoneyError::Overflow)
    }

    /// Sums amounts, failing on overflow.
    pub fn checked_sum<I>(amounts: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

/// Formats with thousands separators, e.g. `-1,250,000`.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{grouped}")
        } else {
            f.write_str(&grouped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(30_000, "30,000")]
    #[case(1_250_000, "1,250,000")]
    #[case(-4500, "-4,500")]
    fn test_display_groups_thousands(#[case] amount: i64, #[case] expected: &str) {
        assert_eq!(Money::from_minor(amount).to_string(), expected);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_minor(15_000);
        assert_eq!(price.checked_mul(2), Ok(Money::from_minor(30_000)));
        assert_eq!(
            price.checked_sub(Money::from_minor(20_000)),
            Ok(Money::from_minor(-5_000))
        );
        assert_eq!(
            Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)),
            Err(MoneyError::Overflow)
        );
        assert_eq!(
            Money::from_minor(i64::MAX / 2).checked_mul(3),
            Err(MoneyError::Overflow)
        );
    }

    #[test]
    fn test_checked_sum() {
        let total = Money::checked_sum([10_000, 2_500, 500].map(Money::from_minor));
        assert_eq!(total, Ok(Money::from_minor(13_000)));
        assert_eq!(Money::checked_sum(Vec::new()), Ok(Money::ZERO));
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_minor(30_000)).unwrap();
        assert_eq!(json, "30000");
        let back: Money = serde_json::from_str("42").unwrap();
        assert_eq!(back.minor(), 42);
    }
}
