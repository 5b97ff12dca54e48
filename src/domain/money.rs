use crate::error::ProposalError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// A currency amount.
///
/// Wraps `rust_decimal::Decimal` so that discount rates such as `0.30` apply
/// exactly and repeated pricing of the same selection is bit-for-bit stable.
/// Serialized in normalized form (`245`, not `245.00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Builds a catalog price, rejecting negative amounts.
    pub fn price(amount: Decimal) -> Result<Self, ProposalError> {
        if amount >= Decimal::ZERO {
            Ok(Self(amount))
        } else {
            Err(ProposalError::CatalogError(format!(
                "price must not be negative, got {}",
                amount
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Clamps negative amounts to zero.
    pub fn floor_at_zero(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Applies a fractional rate, e.g. `0.30` for thirty percent.
    pub fn percentage(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&self.0.normalize(), serializer)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Multiplies by a count of months or sessions.
impl Mul<u32> for Money {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
