//! Configuration for the self-play demo.

use types::GameParameters;

/// Parameters of one demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Number of seats.
    pub players: i64,
    /// Quote rounds per player.
    pub steps_per_player: i64,
    /// Per-quote size cap.
    pub max_contracts_per_trade: i64,
    /// Customer target magnitude cap.
    pub customer_max_size: i64,
    /// Inclusive price cap.
    pub max_contract_value: i64,
    /// Seed for the random policy and chance sampling.
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            players: 4,
            steps_per_player: 2,
            max_contracts_per_trade: 2,
            customer_max_size: 3,
            max_contract_value: 30,
            seed: 7,
        }
    }
}

impl DemoConfig {
    /// The host-facing parameter map for this run.
    pub fn game_params(&self) -> GameParameters {
        let mut params = GameParameters::new();
        params.insert("players".into(), self.players);
        params.insert("steps_per_player".into(), self.steps_per_player);
        params.insert("max_contracts_per_trade".into(), self.max_contracts_per_trade);
        params.insert("customer_max_size".into(), self.customer_max_size);
        params.insert("max_contract_value".into(), self.max_contract_value);
        params
    }
}
