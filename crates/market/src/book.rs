//! Continuous double auction with price-time priority.
//!
//! The book keeps one heap per side, keyed on `(price, id)`: best price at
//! the top, earlier id first within a price. Adding an order triggers the
//! match loop, which repeatedly crosses the best bid with the best ask and
//! executes at the resting order's price.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};
use std::fmt;

use tracing::debug;
use types::{Fill, OrderEntry, OrderSide, PlayerId};

use crate::error::{MarketError, Result};

/// Bid-side heap key: highest price first, then earliest id.
#[derive(Debug, Clone)]
struct BidPriority(OrderEntry);

impl Ord for BidPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .price
            .cmp(&other.0.price)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

impl PartialOrd for BidPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BidPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BidPriority {}

/// Ask-side heap key: lowest price first, then earliest id.
#[derive(Debug, Clone)]
struct AskPriority(OrderEntry);

impl Ord for AskPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .price
            .cmp(&self.0.price)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

impl PartialOrd for AskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AskPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AskPriority {}

/// The live order book of a single game.
///
/// Orders only enter through [`Market::add_order`]; the book never holds a
/// crossed market between calls.
#[derive(Debug, Clone, Default)]
pub struct Market {
    bids: BinaryHeap<BidPriority>,
    asks: BinaryHeap<AskPriority>,
}

impl Market {
    /// Create an empty market.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit an order and run the match loop.
    ///
    /// A zero-quantity order is a no-op and produces no fills. Otherwise the
    /// order rests on its side and the engine crosses the top of the book
    /// until the best bid no longer meets the best ask. Partial remainders
    /// stay in the book at their original price and id.
    pub fn add_order(&mut self, order: OrderEntry) -> Result<Vec<Fill>> {
        if order.quantity.is_zero() {
            return Ok(Vec::new());
        }
        self.push(order);
        self.match_crossing()
    }

    /// Remove every resting order owned by one player.
    ///
    /// Not used during normal play (quotes cannot be cancelled); this is the
    /// cancel-all helper for bookkeeping callers.
    pub fn clear_orders(&mut self, owner: PlayerId) {
        let bids = std::mem::take(&mut self.bids);
        self.bids = bids
            .into_iter()
            .filter(|entry| entry.0.owner != owner)
            .collect();

        let asks = std::mem::take(&mut self.asks);
        self.asks = asks
            .into_iter()
            .filter(|entry| entry.0.owner != owner)
            .collect();
    }

    /// Players with at least one resting order, in seat order.
    pub fn participants(&self) -> Vec<PlayerId> {
        let mut owners = BTreeSet::new();
        for entry in self.bids.iter() {
            owners.insert(entry.0.owner);
        }
        for entry in self.asks.iter() {
            owners.insert(entry.0.owner);
        }
        owners.into_iter().collect()
    }

    /// All resting orders of one player, best-priority first per side.
    pub fn orders_for(&self, owner: PlayerId) -> Vec<OrderEntry> {
        let mut orders: Vec<OrderEntry> = self
            .bids_sorted()
            .into_iter()
            .chain(self.asks_sorted())
            .filter(|order| order.owner == owner)
            .collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    /// Best resting bid, if any.
    pub fn best_bid(&self) -> Option<&OrderEntry> {
        self.bids.peek().map(|entry| &entry.0)
    }

    /// Best resting ask, if any.
    pub fn best_ask(&self) -> Option<&OrderEntry> {
        self.asks.peek().map(|entry| &entry.0)
    }

    /// Total number of resting orders.
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Whether the book holds no orders.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Resting bids, best first.
    pub fn bids_sorted(&self) -> Vec<OrderEntry> {
        let mut orders: Vec<OrderEntry> =
            self.bids.clone().into_iter().map(|entry| entry.0).collect();
        orders.sort_by_key(|order| (std::cmp::Reverse(order.price), order.id));
        orders
    }

    /// Resting asks, best first.
    pub fn asks_sorted(&self) -> Vec<OrderEntry> {
        let mut orders: Vec<OrderEntry> =
            self.asks.clone().into_iter().map(|entry| entry.0).collect();
        orders.sort_by_key(|order| (order.price, order.id));
        orders
    }

    fn push(&mut self, order: OrderEntry) {
        match order.side {
            OrderSide::Buy => self.bids.push(BidPriority(order)),
            OrderSide::Sell => self.asks.push(AskPriority(order)),
        }
    }

    /// Cross the top of the book until the spread is positive again.
    fn match_crossing(&mut self) -> Result<Vec<Fill>> {
        let mut fills = Vec::new();
        loop {
            let crossed = match (self.bids.peek(), self.asks.peek()) {
                (Some(bid), Some(ask)) => bid.0.price >= ask.0.price,
                _ => false,
            };
            if !crossed {
                break;
            }

            let Some(BidPriority(bid)) = self.bids.pop() else {
                break;
            };
            let Some(AskPriority(ask)) = self.asks.pop() else {
                break;
            };

            if bid.id == ask.id {
                return Err(MarketError::DuplicateOrderId(bid.id));
            }

            // The earlier id was resting; trade at its price.
            let quantity = bid.quantity.min(ask.quantity);
            let (resting, aggressor) = if bid.id > ask.id { (ask, bid) } else { (bid, ask) };

            let fill = Fill {
                price: resting.price,
                quantity,
                aggressor_order_id: aggressor.id,
                aggressor_id: aggressor.owner,
                resting_order_id: resting.id,
                resting_id: resting.owner,
                resting_quantity: resting.quantity,
                resting_side: resting.side,
            };
            debug!(
                price = fill.price.raw(),
                quantity = fill.quantity.raw(),
                aggressor = %fill.aggressor_id,
                resting = %fill.resting_id,
                "fill"
            );
            fills.push(fill);

            // The fill took the smaller of the two, so neither side underflows.
            let resting_left = resting.quantity - quantity;
            if !resting_left.is_zero() {
                self.push(resting.with_quantity(resting_left));
            }
            let aggressor_left = aggressor.quantity - quantity;
            if !aggressor_left.is_zero() {
                self.push(aggressor.with_quantity(aggressor_left));
            }
        }
        Ok(fills)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asks = self.asks_sorted();
        writeln!(f, "####### {} sell orders #######", asks.len())?;
        for order in asks.iter().rev() {
            writeln!(f, "{}", order)?;
        }
        writeln!(f, "#############################")?;

        let bids = self.bids_sorted();
        writeln!(f, "####### {} buy orders #######", bids.len())?;
        for order in &bids {
            writeln!(f, "{}", order)?;
        }
        write!(f, "#############################")
    }
}

/// Signed position delta implied by one fill, `(player, contracts, cash)`
/// for both parties. Useful for conservation checks.
pub fn fill_deltas(fill: &Fill) -> [(PlayerId, i64, i64); 2] {
    let qty = fill.quantity.raw() as i64;
    let cash = fill.value().raw();
    if fill.aggressor_bought() {
        [
            (fill.aggressor_id, qty, -cash),
            (fill.resting_id, -qty, cash),
        ]
    } else {
        [
            (fill.aggressor_id, -qty, cash),
            (fill.resting_id, qty, -cash),
        ]
    }
}
