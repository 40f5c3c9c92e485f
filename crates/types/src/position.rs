//! Per-player inventory and cash tracking.

use crate::money::{Cash, Price};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player's running position: signed contract inventory plus cash balance.
///
/// Both start at zero and only change when fills are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerPosition {
    /// Net contracts held (negative when short).
    pub contracts: i64,
    /// Net cash received from trading (negative after net buying).
    pub cash: Cash,
}

impl PlayerPosition {
    /// Mark-to-settlement value of the position.
    pub fn value_at(&self, settlement: Price) -> i64 {
        self.cash.raw() + self.contracts * settlement.raw()
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} contracts, {} cash]", self.contracts, self.cash)
    }
}
