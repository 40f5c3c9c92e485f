//! Order types for the matching engine.

use crate::ids::{OrderId, PlayerId};
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the market the order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    /// Whether this is the buy side.
    pub fn is_buy(self) -> bool {
        matches!(self, OrderSide::Buy)
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A resting or incoming limit order.
///
/// Orders are always limit orders here: one half of a player's two-sided
/// quote. The `id` doubles as the time-priority key (see [`OrderId`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    /// Limit price.
    pub price: Price,
    /// Remaining number of contracts.
    pub quantity: Quantity,
    /// Submission-ordered unique id.
    pub id: OrderId,
    /// Player who owns the order.
    pub owner: PlayerId,
    /// Buy or Sell.
    pub side: OrderSide,
}

impl OrderEntry {
    /// Create a new order.
    pub fn new(
        price: Price,
        quantity: Quantity,
        id: OrderId,
        owner: PlayerId,
        side: OrderSide,
    ) -> Self {
        Self {
            price,
            quantity,
            id,
            owner,
            side,
        }
    }

    /// Copy of this order with a reduced remaining quantity.
    pub fn with_quantity(self, quantity: Quantity) -> Self {
        Self { quantity, ..self }
    }
}

impl fmt::Display for OrderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sz {} @ px {}   id={} @ {}",
            self.quantity, self.price, self.owner, self.id
        )
    }
}
