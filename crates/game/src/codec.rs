//! Phase-dependent action codec.
//!
//! Each non-terminal phase maps its structured actions onto a dense id range
//! `[0, max]`; `decode` and `encode` form an exact bijection over that range.
//! The phase itself is a pure function of the move counter, so the codec is
//! the single authority on both "what can happen now" and "what does this id
//! mean".

use types::{
    ActionId, GameConfig, MoveNumber, Phase, Price, Quantity, Quote, RoleAssignment,
    StructuredAction,
};

use crate::error::{GameError, Result};
use crate::perm;

/// Raw-id ⇄ structured-action bijection for one game configuration.
#[derive(Debug, Clone, Copy)]
pub struct ActionCodec {
    config: GameConfig,
}

impl ActionCodec {
    /// Create a codec for a configuration.
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// The configuration this codec encodes for.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Phase of a move counter. Total over all `m`; every
    /// `m >= total_moves` is `Terminal`.
    pub fn phase_of(&self, move_number: MoveNumber) -> Phase {
        let customers_until = 4 + self.config.num_customers();
        if move_number < 2 {
            Phase::ChanceValue
        } else if move_number == 2 {
            Phase::ChanceHighLow
        } else if move_number == 3 {
            Phase::ChancePermutation
        } else if move_number < customers_until {
            Phase::CustomerSize
        } else if move_number < self.config.total_moves() {
            Phase::PlayerTrading
        } else {
            Phase::Terminal
        }
    }

    /// Inclusive legal id range `(0, max)` of a phase.
    pub fn action_range(&self, phase: Phase) -> Result<(ActionId, ActionId)> {
        let max = match phase {
            Phase::ChanceValue => self.config.max_contract_value as u64 - 1,
            Phase::ChanceHighLow => 1,
            Phase::ChancePermutation => perm::factorial(self.config.num_players) - 1,
            Phase::CustomerSize => 2 * self.config.customer_max_size as u64,
            Phase::PlayerTrading => self.config.num_distinct_actions() - 1,
            Phase::Terminal => return Err(GameError::PhaseMismatch { phase }),
        };
        Ok((0, max))
    }

    /// Number of legal actions in a phase.
    pub fn num_actions(&self, phase: Phase) -> Result<u64> {
        let (min, max) = self.action_range(phase)?;
        Ok(max - min + 1)
    }

    /// Decode a raw id into the phase's structured action.
    pub fn decode(&self, phase: Phase, action: ActionId) -> Result<StructuredAction> {
        let (_, max) = self.action_range(phase)?;
        if action > max {
            return Err(GameError::InvalidAction { phase, action, max });
        }

        match phase {
            Phase::ChanceValue => Ok(StructuredAction::ContractValue {
                value: Price(action as i64 + 1),
            }),
            Phase::ChanceHighLow => Ok(StructuredAction::HighLow {
                is_high: action == 1,
            }),
            Phase::ChancePermutation => {
                let permutation = perm::unrank(action, self.config.num_players)?;
                Ok(StructuredAction::Permutation(
                    RoleAssignment::from_permutation(permutation),
                ))
            }
            Phase::CustomerSize => {
                // Id customer_max_size maps to +1; zero is unrepresentable.
                let mut size = action as i64 - self.config.customer_max_size;
                if size >= 0 {
                    size += 1;
                }
                Ok(StructuredAction::CustomerTarget { size })
            }
            Phase::PlayerTrading => {
                let sizes = self.config.max_contracts_per_trade + 1;
                let prices = self.config.max_contract_value as u64;

                let mut rolling = action;
                let bid_size = rolling / (sizes * prices * prices);
                rolling %= sizes * prices * prices;
                let ask_size = rolling / (prices * prices);
                rolling %= prices * prices;
                let bid_price = rolling / prices + 1;
                let ask_price = rolling % prices + 1;

                Ok(StructuredAction::Quote(Quote::new(
                    Quantity(bid_size),
                    Quantity(ask_size),
                    Price(bid_price as i64),
                    Price(ask_price as i64),
                )))
            }
            Phase::Terminal => Err(GameError::PhaseMismatch { phase }),
        }
    }

    /// Encode a structured action back into the phase's raw id.
    ///
    /// The action must both belong to the phase and lie inside its domain;
    /// in particular a zero customer target is rejected rather than encoded
    /// onto the id that decodes to `+1`.
    pub fn encode(&self, phase: Phase, action: &StructuredAction) -> Result<ActionId> {
        match (phase, action) {
            (Phase::ChanceValue, StructuredAction::ContractValue { value }) => {
                if value.raw() < 1 || value.raw() > self.config.max_contract_value {
                    return Err(GameError::ValueOutOfRange(value.raw()));
                }
                Ok(value.raw() as u64 - 1)
            }
            (Phase::ChanceHighLow, StructuredAction::HighLow { is_high }) => {
                Ok(u64::from(*is_high))
            }
            (Phase::ChancePermutation, StructuredAction::Permutation(assignment)) => {
                self.check_permutation(&assignment.permutation)?;
                Ok(perm::rank(&assignment.permutation))
            }
            (Phase::CustomerSize, StructuredAction::CustomerTarget { size }) => {
                if *size == 0 {
                    return Err(GameError::ZeroTarget);
                }
                let adjusted = if *size > 0 { size - 1 } else { *size };
                let id = adjusted + self.config.customer_max_size;
                if id < 0 || id > 2 * self.config.customer_max_size {
                    return Err(GameError::TargetOutOfRange(*size));
                }
                Ok(id as u64)
            }
            (Phase::PlayerTrading, StructuredAction::Quote(quote)) => {
                self.check_quote(quote)?;
                let sizes = self.config.max_contracts_per_trade + 1;
                let prices = self.config.max_contract_value as u64;
                Ok(quote.bid_size.raw() * sizes * prices * prices
                    + quote.ask_size.raw() * prices * prices
                    + (quote.bid_price.raw() as u64 - 1) * prices
                    + (quote.ask_price.raw() as u64 - 1))
            }
            (phase, _) => Err(GameError::PhaseMismatch { phase }),
        }
    }

    /// Id for a chance draw of one candidate contract value.
    pub fn contract_value_action(&self, value: i64) -> Result<ActionId> {
        self.encode(
            Phase::ChanceValue,
            &StructuredAction::ContractValue {
                value: Price(value),
            },
        )
    }

    /// Id for the high/low settlement draw.
    pub fn high_low_action(&self, is_high: bool) -> ActionId {
        u64::from(is_high)
    }

    /// Id for a role permutation draw.
    pub fn permutation_action(&self, permutation: Vec<usize>) -> Result<ActionId> {
        self.check_permutation(&permutation)?;
        Ok(perm::rank(&permutation))
    }

    /// Id for a customer target draw.
    pub fn customer_target_action(&self, size: i64) -> Result<ActionId> {
        self.encode(Phase::CustomerSize, &StructuredAction::CustomerTarget { size })
    }

    /// Id for a two-sided player quote.
    pub fn quote_action(
        &self,
        bid_price: i64,
        bid_size: u64,
        ask_price: i64,
        ask_size: u64,
    ) -> Result<ActionId> {
        self.encode(
            Phase::PlayerTrading,
            &StructuredAction::Quote(Quote::new(
                Quantity(bid_size),
                Quantity(ask_size),
                Price(bid_price),
                Price(ask_price),
            )),
        )
    }

    fn check_permutation(&self, permutation: &[usize]) -> Result<()> {
        let n = self.config.num_players;
        let mut seen = vec![false; n];
        let valid = permutation.len() == n
            && permutation.iter().all(|&p| {
                if p >= n || seen[p] {
                    false
                } else {
                    seen[p] = true;
                    true
                }
            });
        if valid {
            Ok(())
        } else {
            Err(GameError::NotAPermutation(permutation.to_vec()))
        }
    }

    fn check_quote(&self, quote: &Quote) -> Result<()> {
        let price_ok = |price: Price| price.raw() >= 1 && price.raw() <= self.config.max_contract_value;
        let size_ok = |size: Quantity| size.raw() <= self.config.max_contracts_per_trade;
        if price_ok(quote.bid_price)
            && price_ok(quote.ask_price)
            && size_ok(quote.bid_size)
            && size_ok(quote.ask_size)
        {
            Ok(())
        } else {
            Err(GameError::QuoteOutOfRange(*quote))
        }
    }
}
