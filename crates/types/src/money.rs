//! Integer monetary types.
//!
//! Contract prices in this game are whole integers in `[1, max_contract_value]`,
//! so there is no fixed-point scale: `Price(7)` is seven currency units.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Contract count on one side of a quote, order, or fill.
///
/// Always small here: quote sides are capped at `max_contracts_per_trade`
/// and a fill never exceeds the smaller of the two crossing orders, so the
/// only arithmetic a count needs is the subtraction that leaves a partial
/// remainder. Ordering is derived; a zero count means the side is disabled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Sub,
)]
pub struct Quantity(pub u64);

impl Quantity {
    /// Raw contract count.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Whether this side carries no contracts.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer contract price.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if price is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<i64> for Price {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

/// Signed cash balance.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Cash(pub i64);

impl Cash {
    pub const ZERO: Cash = Cash(0);

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cash({})", self.0)
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<i64> for Cash {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl Mul<Quantity> for Price {
    type Output = Cash;

    /// Cash that changes hands when `quantity` contracts trade at this
    /// price. The counterparty sees the same amount with the opposite sign.
    fn mul(self, quantity: Quantity) -> Cash {
        Cash(self.0 * quantity.0 as i64)
    }
}
