//! Fill records produced by the matching engine.

use crate::ids::{OrderId, PlayerId};
use crate::money::{Cash, Price, Quantity};
use crate::order::OrderSide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single execution between an incoming order and a resting quote.
///
/// The resting order is the one that was already in the book when the cross
/// happened; the fill always executes at its price, so any price improvement
/// accrues to the aggressor. A fill carries enough detail to reconstruct the
/// cash and contract deltas of both parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Execution price (the resting order's limit price).
    pub price: Price,
    /// Number of contracts exchanged.
    pub quantity: Quantity,
    /// Id of the incoming order that crossed the spread.
    pub aggressor_order_id: OrderId,
    /// Player who submitted the incoming order.
    pub aggressor_id: PlayerId,
    /// Id of the resting order that was hit.
    pub resting_order_id: OrderId,
    /// Player whose resting quote was hit.
    pub resting_id: PlayerId,
    /// Remaining quantity of the resting order at the moment of the cross.
    pub resting_quantity: Quantity,
    /// Side of the resting order. `Sell` means the aggressor bought.
    pub resting_side: OrderSide,
}

impl Fill {
    /// Cash value of this fill.
    #[inline]
    pub fn value(&self) -> Cash {
        self.price * self.quantity
    }

    /// Whether the aggressor was the buyer.
    #[inline]
    pub fn aggressor_bought(&self) -> bool {
        self.resting_side == OrderSide::Sell
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sz {} @ px {} on {}. {} crossed with {}'s quote sz {} @ px {}",
            self.quantity,
            self.price,
            self.aggressor_order_id,
            self.aggressor_id,
            self.resting_id,
            self.resting_quantity,
            self.price
        )
    }
}
