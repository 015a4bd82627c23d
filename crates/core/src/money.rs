//! Fixed-point monetary amounts.
//!
//! Amounts are held as signed integers in the smallest currency unit (cents),
//! so sums and equality checks are exact. Currency is not modelled.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minor units per major unit.
const SCALE: i64 = 100;

/// Monetary amount in minor units (e.g. cents).
///
/// Signed so that non-positive inputs can be represented at the boundary and
/// rejected by the domain rules that care.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Convert a decimal amount (e.g. `19.99`), rounding to the nearest minor unit.
    pub fn from_major(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        let minor = (amount * SCALE as f64).round();
        if minor >= i64::MAX as f64 || minor < i64::MIN as f64 {
            return Err(DomainError::validation("amount is out of range"));
        }
        if minor == 0.0 && amount != 0.0 {
            return Err(DomainError::validation(
                "amount is below the smallest currency unit",
            ));
        }
        Ok(Self(minor as i64))
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiply by an integer factor (e.g. a quantity).
    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    pub fn saturating_mul(self, factor: i64) -> Money {
        Money(self.0.saturating_mul(factor))
    }

    /// Sum of all amounts, `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let minor = self.0 as i128;
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.abs();
        let scale = SCALE as i128;
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}
