//! Game configuration and the host-facing parameter surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Integer key/value parameters accepted when creating a game.
///
/// Recognized keys: `players`, `steps_per_player`, `max_contracts_per_trade`,
/// `customer_max_size`, `max_contract_value`.
pub type GameParameters = BTreeMap<String, i64>;

/// Reasons a [`GameConfig`] can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Player count outside `[4, 10]`.
    PlayerCount(usize),
    /// `steps_per_player` must be at least 1.
    StepsPerPlayer(usize),
    /// `max_contracts_per_trade` must be at least 1.
    MaxContractsPerTrade(u64),
    /// `max_contract_value` must be at least 2.
    MaxContractValue(i64),
    /// `customer_max_size` must be at least 1.
    CustomerMaxSize(i64),
    /// A parameter key the game does not recognize.
    UnknownParameter(String),
    /// A parameter value that does not fit its field.
    BadParameter(String, i64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PlayerCount(n) => {
                write!(f, "players must be in [4, 10], got {}", n)
            }
            ConfigError::StepsPerPlayer(n) => {
                write!(f, "steps_per_player must be at least 1, got {}", n)
            }
            ConfigError::MaxContractsPerTrade(n) => {
                write!(f, "max_contracts_per_trade must be at least 1, got {}", n)
            }
            ConfigError::MaxContractValue(n) => {
                write!(f, "max_contract_value must be at least 2, got {}", n)
            }
            ConfigError::CustomerMaxSize(n) => {
                write!(f, "customer_max_size must be at least 1, got {}", n)
            }
            ConfigError::UnknownParameter(key) => {
                write!(f, "unknown game parameter: {}", key)
            }
            ConfigError::BadParameter(key, value) => {
                write!(f, "parameter {} cannot take value {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable configuration of one game instance.
///
/// Three of the players carry informed roles (two value cheaters and one
/// high-low cheater); the remaining `num_players - 3` seats are customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats, in `[4, 10]`.
    pub num_players: usize,
    /// Quote rounds each player receives.
    pub steps_per_player: usize,
    /// Per-quote size cap on each side.
    pub max_contracts_per_trade: u64,
    /// Inclusive price cap; candidate contract values live in `[1, this]`.
    pub max_contract_value: i64,
    /// Magnitude cap on customer target positions.
    pub customer_max_size: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 5,
            steps_per_player: 100,
            max_contracts_per_trade: 5,
            max_contract_value: 30,
            customer_max_size: 5,
        }
    }
}

impl GameConfig {
    /// Validate every bound; returns the config on success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(4..=10).contains(&self.num_players) {
            return Err(ConfigError::PlayerCount(self.num_players));
        }
        if self.steps_per_player < 1 {
            return Err(ConfigError::StepsPerPlayer(self.steps_per_player));
        }
        if self.max_contracts_per_trade < 1 {
            return Err(ConfigError::MaxContractsPerTrade(
                self.max_contracts_per_trade,
            ));
        }
        if self.max_contract_value < 2 {
            return Err(ConfigError::MaxContractValue(self.max_contract_value));
        }
        if self.customer_max_size < 1 {
            return Err(ConfigError::CustomerMaxSize(self.customer_max_size));
        }
        Ok(self)
    }

    /// Build a config from the host parameter surface.
    ///
    /// Missing keys fall back to defaults; unknown keys are rejected.
    pub fn from_params(params: &GameParameters) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, &value) in params {
            match key.as_str() {
                "players" => {
                    config.num_players = usize::try_from(value)
                        .map_err(|_| ConfigError::BadParameter(key.clone(), value))?;
                }
                "steps_per_player" => {
                    config.steps_per_player = usize::try_from(value)
                        .map_err(|_| ConfigError::BadParameter(key.clone(), value))?;
                }
                "max_contracts_per_trade" => {
                    config.max_contracts_per_trade = u64::try_from(value)
                        .map_err(|_| ConfigError::BadParameter(key.clone(), value))?;
                }
                "max_contract_value" => config.max_contract_value = value,
                "customer_max_size" => config.customer_max_size = value,
                _ => return Err(ConfigError::UnknownParameter(key.clone())),
            }
        }
        config.validated()
    }

    /// Set the number of players.
    pub fn with_players(mut self, num_players: usize) -> Self {
        self.num_players = num_players;
        self
    }

    /// Set the number of quote rounds per player.
    pub fn with_steps_per_player(mut self, steps: usize) -> Self {
        self.steps_per_player = steps;
        self
    }

    /// Set the per-quote size cap.
    pub fn with_max_contracts_per_trade(mut self, max: u64) -> Self {
        self.max_contracts_per_trade = max;
        self
    }

    /// Set the inclusive price cap.
    pub fn with_max_contract_value(mut self, max: i64) -> Self {
        self.max_contract_value = max;
        self
    }

    /// Set the customer target magnitude cap.
    pub fn with_customer_max_size(mut self, max: i64) -> Self {
        self.customer_max_size = max;
        self
    }

    /// Number of customer seats.
    pub fn num_customers(&self) -> usize {
        self.num_players - 3
    }

    /// Number of leading chance moves: two values, high/low, the
    /// permutation, and one target draw per customer.
    pub fn chance_moves(&self) -> usize {
        4 + self.num_customers()
    }

    /// Total moves in a game, after which the state is terminal.
    pub fn total_moves(&self) -> usize {
        self.chance_moves() + self.steps_per_player * self.num_players
    }

    /// Size of the densest action space (the trading phase).
    pub fn num_distinct_actions(&self) -> u64 {
        let sizes = self.max_contracts_per_trade + 1;
        let prices = self.max_contract_value as u64;
        sizes * sizes * prices * prices
    }

    /// Length of the information-state / observation tensor.
    pub fn tensor_len(&self) -> usize {
        11 + self.steps_per_player * self.num_players * 6 + self.num_players * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validated().is_ok());
    }

    #[test]
    fn bounds_are_enforced() {
        assert_eq!(
            GameConfig::default().with_players(3).validated(),
            Err(ConfigError::PlayerCount(3))
        );
        assert_eq!(
            GameConfig::default().with_players(11).validated(),
            Err(ConfigError::PlayerCount(11))
        );
        assert_eq!(
            GameConfig::default().with_max_contract_value(1).validated(),
            Err(ConfigError::MaxContractValue(1))
        );
        assert_eq!(
            GameConfig::default().with_steps_per_player(0).validated(),
            Err(ConfigError::StepsPerPlayer(0))
        );
    }

    #[test]
    fn derived_counts() {
        let config = GameConfig::default()
            .with_players(4)
            .with_steps_per_player(2);
        assert_eq!(config.num_customers(), 1);
        assert_eq!(config.chance_moves(), 5);
        assert_eq!(config.total_moves(), 13);
        assert_eq!(config.tensor_len(), 11 + 2 * 4 * 6 + 4 * 2);
    }

    #[test]
    fn params_surface_round_trip() {
        let mut params = GameParameters::new();
        params.insert("players".into(), 4);
        params.insert("steps_per_player".into(), 2);
        params.insert("max_contracts_per_trade".into(), 2);
        params.insert("customer_max_size".into(), 3);
        params.insert("max_contract_value".into(), 30);

        let config = GameConfig::from_params(&params).unwrap();
        assert_eq!(config.num_players, 4);
        assert_eq!(config.steps_per_player, 2);
        assert_eq!(config.max_contracts_per_trade, 2);
        assert_eq!(config.customer_max_size, 3);
        assert_eq!(config.max_contract_value, 30);
        assert_eq!(config.num_distinct_actions(), 3 * 3 * 30 * 30);
    }

    #[test]
    fn unknown_parameter_rejected() {
        let mut params = GameParameters::new();
        params.insert("latency_ticks".into(), 1);
        assert_eq!(
            GameConfig::from_params(&params),
            Err(ConfigError::UnknownParameter("latency_ticks".into()))
        );
    }
}
