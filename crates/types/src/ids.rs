//! Core identifier types for the trading game.
//!
//! Newtypes keep player seats and order ids from being mixed up with the
//! plain integers that flow through the action codec.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw action id as exchanged with the host framework.
///
/// Every phase of the game maps its structured actions onto a dense
/// non-negative range starting at zero.
pub type ActionId = u64;

/// Move counter of a game in progress (0-based).
pub type MoveNumber = usize;

/// A player's seat index, in `[0, num_players)`.
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
    From,
    Into,
)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Unique identifier for an order submitted to the market.
///
/// Ids are strictly increasing in submission order, so the smaller id of two
/// crossing orders is always the resting one. Time priority within a price
/// level falls out of the same ordering.
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
    From,
    Into,
)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
