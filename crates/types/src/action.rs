//! Structured actions, phases, and player roles.
//!
//! The host framework exchanges raw dense action ids; everything in the game
//! core works with the typed forms defined here. The codec in the `game`
//! crate is the bijection between the two.

use crate::ids::PlayerId;
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six symbolic stages of a game, a pure function of the move counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Moves 0 and 1: draw the two candidate contract values.
    ChanceValue,
    /// Move 2: draw whether settlement takes the high or low candidate.
    ChanceHighLow,
    /// Move 3: draw the role permutation.
    ChancePermutation,
    /// Moves 4 .. 4 + num_customers: draw each customer's target position.
    CustomerSize,
    /// Round-robin quoting until every player has used its steps.
    PlayerTrading,
    /// Absorbing end state.
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ChanceValue => "ChanceValue",
            Phase::ChanceHighLow => "ChanceHighLow",
            Phase::ChancePermutation => "ChancePermutation",
            Phase::CustomerSize => "CustomerSize",
            Phase::PlayerTrading => "PlayerTrading",
            Phase::Terminal => "Terminal",
        };
        f.write_str(name)
    }
}

/// Private role assigned to each player by the permutation draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Knows one of the two candidate contract values.
    ValueCheater,
    /// Knows whether settlement is the high or the low candidate.
    HighLowCheater,
    /// Carries a target position and a penalty for missing it.
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::ValueCheater => "ValueCheater",
            Role::HighLowCheater => "HighLowCheater",
            Role::Customer => "Customer",
        };
        f.write_str(name)
    }
}

/// The role permutation and the per-player roles derived from it.
///
/// Slot `i` of the permutation holds player `i`'s rank: ranks 0 and 1 are the
/// two value cheaters, rank 2 the high-low cheater, everything above a
/// customer. Exactly two ValueCheaters and one HighLowCheater exist by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// `permutation[i]` is player `i`'s rank in `[0, num_players)`.
    pub permutation: Vec<usize>,
    /// `roles[i]` is player `i`'s derived role.
    pub roles: Vec<Role>,
}

impl RoleAssignment {
    /// Derive roles from a permutation of `[0, num_players)`.
    pub fn from_permutation(permutation: Vec<usize>) -> Self {
        let roles = permutation
            .iter()
            .map(|&rank| match rank {
                0 | 1 => Role::ValueCheater,
                2 => Role::HighLowCheater,
                _ => Role::Customer,
            })
            .collect();
        Self { permutation, roles }
    }

    /// Number of players covered by this assignment.
    pub fn num_players(&self) -> usize {
        self.permutation.len()
    }

    /// Role of one player.
    pub fn role_of(&self, player: PlayerId) -> Role {
        self.roles[player.0]
    }

    /// The permutation slot holding `player`, i.e. the index `j` with
    /// `permutation[j] == player`. Used to look up which candidate value a
    /// value cheater sees and which customer a target draw belongs to.
    pub fn slot_of(&self, player: PlayerId) -> Option<usize> {
        self.permutation.iter().position(|&p| p == player.0)
    }

    /// Player sitting at a permutation slot.
    pub fn player_at(&self, slot: usize) -> PlayerId {
        PlayerId(self.permutation[slot])
    }
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player roles: ")?;
        for (i, role) in self.roles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "P{}={}", i, role)?;
        }
        Ok(())
    }
}

/// A player's two-sided quote, submitted atomically.
///
/// A zero size disables that side of the quote; prices are always in
/// `[1, max_contract_value]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Number of contracts bid for.
    pub bid_size: Quantity,
    /// Number of contracts offered.
    pub ask_size: Quantity,
    /// Bid limit price.
    pub bid_price: Price,
    /// Ask limit price.
    pub ask_price: Price,
}

impl Quote {
    /// Create a new quote.
    pub fn new(bid_size: Quantity, ask_size: Quantity, bid_price: Price, ask_price: Price) -> Self {
        Self {
            bid_size,
            ask_size,
            bid_price,
            ask_price,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} | {} x {}",
            self.bid_price, self.ask_price, self.bid_size, self.ask_size
        )
    }
}

/// A raw action id decoded into its phase-dependent typed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuredAction {
    /// One candidate contract value in `[1, max_contract_value]`.
    ContractValue { value: Price },
    /// Whether settlement takes the higher candidate.
    HighLow { is_high: bool },
    /// The role permutation draw.
    Permutation(RoleAssignment),
    /// A customer's nonzero target position.
    CustomerTarget { size: i64 },
    /// A player's two-sided quote.
    Quote(Quote),
}

impl fmt::Display for StructuredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredAction::ContractValue { value } => {
                write!(f, "settle one contract value candidate to {}", value)
            }
            StructuredAction::HighLow { is_high } => {
                write!(
                    f,
                    "choose {} contract settlement",
                    if *is_high { "high" } else { "low" }
                )
            }
            StructuredAction::Permutation(assignment) => assignment.fmt(f),
            StructuredAction::CustomerTarget { size } => {
                write!(f, "customer target position: {}", size)
            }
            StructuredAction::Quote(quote) => write!(f, "quote {}", quote),
        }
    }
}

/// Whose turn it is: a chance node, a player seat, or nobody (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// A chance node resolves the current move.
    Chance,
    /// The given player acts.
    Player(PlayerId),
    /// The game is over.
    Terminal,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Chance => write!(f, "Chance"),
            Actor::Player(p) => p.fmt(f),
            Actor::Terminal => write!(f, "Terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_derived_from_permutation() {
        let assignment = RoleAssignment::from_permutation(vec![3, 1, 2, 0]);
        assert_eq!(
            assignment.roles,
            vec![
                Role::Customer,
                Role::ValueCheater,
                Role::HighLowCheater,
                Role::ValueCheater
            ]
        );
    }

    #[test]
    fn slot_lookup_inverts_permutation() {
        let assignment = RoleAssignment::from_permutation(vec![2, 0, 3, 1]);
        for player in 0..4 {
            let slot = assignment.slot_of(PlayerId(player)).unwrap();
            assert_eq!(assignment.permutation[slot], player);
        }
    }

    #[test]
    fn quote_display_is_compact() {
        let quote = Quote::new(Quantity(1), Quantity(2), Price(10), Price(12));
        assert_eq!(quote.to_string(), "10 @ 12 | 1 x 2");
    }
}
