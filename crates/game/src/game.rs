//! Host-framework surface of the high-low trading game.
//!
//! A `HighLowTradingGame` is the immutable half of the boundary a host
//! framework sees: action-space and length metadata plus a factory for fresh
//! states. All per-game data lives in [`GameState`].

use types::{GameConfig, GameParameters, Phase};

use crate::codec::ActionCodec;
use crate::error::Result;
use crate::state::GameState;

/// Registered short name of the game.
pub const GAME_NAME: &str = "high_low_trading";

/// An immutable game definition for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct HighLowTradingGame {
    codec: ActionCodec,
}

impl HighLowTradingGame {
    /// Build a game after validating the configuration.
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(Self {
            codec: ActionCodec::new(config.validated()?),
        })
    }

    /// Build a game from the host parameter surface.
    pub fn from_params(params: &GameParameters) -> Result<Self> {
        Ok(Self {
            codec: ActionCodec::new(GameConfig::from_params(params)?),
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GameConfig {
        self.codec.config()
    }

    /// The codec shared by every state of this game.
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Number of seats.
    pub fn num_players(&self) -> usize {
        self.config().num_players
    }

    /// Size of the densest action space (the trading phase).
    pub fn num_distinct_actions(&self) -> u64 {
        self.config().num_distinct_actions()
    }

    /// One more than the widest chance range.
    pub fn max_chance_outcomes(&self) -> u64 {
        let chance_phases = [
            Phase::ChanceValue,
            Phase::ChanceHighLow,
            Phase::ChancePermutation,
            Phase::CustomerSize,
        ];
        let widest = chance_phases
            .iter()
            .filter_map(|&phase| self.codec.num_actions(phase).ok())
            .max()
            .unwrap_or(0);
        widest + 1
    }

    /// Total moves in a game.
    pub fn max_game_length(&self) -> usize {
        self.config().total_moves()
    }

    /// Number of leading chance nodes.
    pub fn max_chance_nodes_in_history(&self) -> usize {
        self.config().chance_moves()
    }

    /// Shape of the information-state tensor.
    pub fn information_state_tensor_shape(&self) -> Vec<usize> {
        vec![self.config().tensor_len()]
    }

    /// Shape of the observation tensor; identical to the information state.
    pub fn observation_tensor_shape(&self) -> Vec<usize> {
        self.information_state_tensor_shape()
    }

    /// Fresh state at move 0.
    pub fn new_initial_state(&self) -> GameState {
        GameState::new(*self.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ConfigError;
    use crate::error::GameError;

    fn small_game() -> HighLowTradingGame {
        HighLowTradingGame::new(
            GameConfig::default()
                .with_players(4)
                .with_steps_per_player(2)
                .with_max_contracts_per_trade(2)
                .with_customer_max_size(3)
                .with_max_contract_value(30),
        )
        .unwrap()
    }

    #[test]
    fn metadata_matches_the_configuration() {
        let game = small_game();
        assert_eq!(game.num_players(), 4);
        assert_eq!(game.num_distinct_actions(), 3 * 3 * 30 * 30);
        assert_eq!(game.max_game_length(), 13);
        assert_eq!(game.max_chance_nodes_in_history(), 5);
        assert_eq!(game.information_state_tensor_shape(), vec![11 + 2 * 4 * 6 + 4 * 2]);
        assert_eq!(
            game.observation_tensor_shape(),
            game.information_state_tensor_shape()
        );
    }

    #[test]
    fn chance_outcome_bound_covers_the_widest_phase() {
        let game = small_game();
        // The widest chance range is the contract value draw (30 outcomes).
        assert_eq!(game.max_chance_outcomes(), 31);

        // With more players the permutation range dominates: 5! = 120.
        let game = HighLowTradingGame::new(
            GameConfig::default()
                .with_players(5)
                .with_max_contract_value(30),
        )
        .unwrap();
        assert_eq!(game.max_chance_outcomes(), 121);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let result = HighLowTradingGame::new(GameConfig::default().with_players(3));
        assert_eq!(
            result.map(|_| ()),
            Err(GameError::Config(ConfigError::PlayerCount(3)))
        );
    }

    #[test]
    fn initial_state_starts_at_move_zero() {
        let game = small_game();
        let state = game.new_initial_state();
        assert_eq!(state.move_number(), 0);
        assert!(state.is_chance_node());
        assert!(!state.is_terminal());
    }
}
