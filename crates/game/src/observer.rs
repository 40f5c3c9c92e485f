//! Per-player observations.
//!
//! The game is Markov in the information state, so the observation and the
//! information state are the same thing in both string and tensor form. The
//! tensor is a flat `Vec<f32>` of fixed length
//! `11 + steps_per_player·num_players·6 + num_players·2`:
//!
//! | offset | width | contents |
//! |--------|-------|----------|
//! | 0 | 5 | configuration: steps, trade cap, target cap, price cap, players |
//! | 5 | 3 | observer role one-hot (zero until the permutation is drawn) |
//! | 8 | 2 | observer seat as `sin`/`cos` of `2π·id/num_players` |
//! | 10 | 1 | private payload: candidate value, ±1 high/low, or target |
//! | 11 | 2·np | every player's `(contracts, cash)` |
//! | 11+2·np | 6 each | quote log: prices, sizes, actor seat as `sin`/`cos` |

use std::f32::consts::TAU;
use std::fmt;

use types::{PlayerId, Role};

use crate::error::Result;
use crate::state::GameState;

/// Everything every player can see: configuration, quote and fill logs,
/// positions, and the current book.
struct PublicInfo<'a>(&'a GameState);

impl fmt::Display for PublicInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let config = state.config();

        writeln!(f, "********** Game Configuration **********")?;
        writeln!(f, "Steps per player: {}", config.steps_per_player)?;
        writeln!(f, "Max contracts per trade: {}", config.max_contracts_per_trade)?;
        writeln!(f, "Customer max size: {}", config.customer_max_size)?;
        writeln!(f, "Max contract value: {}", config.max_contract_value)?;
        writeln!(f, "Number of players: {}", config.num_players)?;
        writeln!(f, "****************************************")?;
        writeln!(f)?;

        writeln!(f, "********** Quotes & Fills **********")?;
        for (player, quote) in state.quotes() {
            writeln!(f, "Player {} quote: {}", player, quote)?;
        }
        for fill in state.fills() {
            writeln!(f, "Order fill: {}", fill)?;
        }
        writeln!(f, "***********************************")?;
        writeln!(f)?;

        writeln!(f, "********** Player Positions **********")?;
        for (seat, position) in state.positions().iter().enumerate() {
            writeln!(f, "Player P{} position: {}", seat, position)?;
        }
        writeln!(f, "**************************************")?;
        writeln!(f)?;

        writeln!(f, "********** Current Market **********")?;
        writeln!(f, "{}", state.market())
    }
}

/// Omniscient rendering: the hidden setup followed by the public log.
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "********** Game Setup **********")?;
        writeln!(
            f,
            "Contract values: {}, {}",
            self.contract_values[0], self.contract_values[1]
        )?;
        writeln!(
            f,
            "Contract settlement: {}",
            if self.high_settle { "High" } else { "Low" }
        )?;
        match &self.roles {
            Some(assignment) => writeln!(f, "{}", assignment)?,
            None => writeln!(f, "Player roles: pending")?,
        }
        for (seat, &target) in self.target_positions.iter().enumerate() {
            if target == 0 {
                writeln!(f, "Player P{} target position: no requirement", seat)?;
            } else {
                writeln!(f, "Player P{} target position: {}", seat, target)?;
            }
        }
        writeln!(f, "********************************")?;
        writeln!(f)?;
        PublicInfo(self).fmt(f)
    }
}

/// One player's view, string form.
struct InfoStateString<'a> {
    state: &'a GameState,
    player: PlayerId,
}

impl fmt::Display for InfoStateString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        writeln!(f, "********** Private Information **********")?;
        match state.roles() {
            Some(assignment) => {
                let role = assignment.role_of(self.player);
                writeln!(f, "My role: {}", role)?;
                match role {
                    Role::ValueCheater => {
                        if let Some(slot @ 0..=1) = assignment.slot_of(self.player) {
                            writeln!(
                                f,
                                "Candidate contract value: {}",
                                state.contract_values[slot]
                            )?;
                        }
                    }
                    Role::HighLowCheater => {
                        writeln!(
                            f,
                            "Settlement will be: {}",
                            if state.high_settle { "High" } else { "Low" }
                        )?;
                    }
                    Role::Customer => {
                        let target = state.target_positions[self.player.0];
                        if target != 0 {
                            writeln!(f, "My target position: {}", target)?;
                        } else {
                            writeln!(f, "My target position: pending")?;
                        }
                    }
                }
                PublicInfo(state).fmt(f)?;
            }
            None => writeln!(f, "Private info pending...")?,
        }
        writeln!(f, "***************************")
    }
}

impl GameState {
    /// Everything `player` may legally see, string form.
    pub fn information_state_string(&self, player: PlayerId) -> Result<String> {
        self.check_player(player)?;
        Ok(InfoStateString {
            state: self,
            player,
        }
        .to_string())
    }

    /// Everything `player` may legally see, tensor form.
    pub fn information_state_tensor(&self, player: PlayerId) -> Result<Vec<f32>> {
        self.check_player(player)?;
        let config = self.config();
        let num_players = config.num_players;
        let mut values = vec![0.0f32; config.tensor_len()];

        values[0] = config.steps_per_player as f32;
        values[1] = config.max_contracts_per_trade as f32;
        values[2] = config.customer_max_size as f32;
        values[3] = config.max_contract_value as f32;
        values[4] = num_players as f32;

        if let Some(assignment) = self.roles() {
            match assignment.role_of(player) {
                Role::ValueCheater => values[5] = 1.0,
                Role::HighLowCheater => values[6] = 1.0,
                Role::Customer => values[7] = 1.0,
            }
        }

        let angle = TAU * player.0 as f32 / num_players as f32;
        values[8] = angle.sin();
        values[9] = angle.cos();

        if let Some(assignment) = self.roles() {
            values[10] = match assignment.role_of(player) {
                Role::ValueCheater => match assignment.slot_of(player) {
                    Some(slot @ 0..=1) => self.contract_values[slot].raw() as f32,
                    _ => 0.0,
                },
                Role::HighLowCheater => {
                    if self.high_settle {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Role::Customer => self.target_positions[player.0] as f32,
            };
        }

        let mut offset = 11;
        for position in self.positions() {
            values[offset] = position.contracts as f32;
            values[offset + 1] = position.cash.raw() as f32;
            offset += 2;
        }

        for (actor, quote) in self.quotes() {
            values[offset] = quote.bid_price.raw() as f32;
            values[offset + 1] = quote.ask_price.raw() as f32;
            values[offset + 2] = quote.bid_size.raw() as f32;
            values[offset + 3] = quote.ask_size.raw() as f32;
            let actor_angle = TAU * actor.0 as f32 / num_players as f32;
            values[offset + 4] = actor_angle.sin();
            values[offset + 5] = actor_angle.cos();
            offset += 6;
        }

        Ok(values)
    }

    /// Observation equals the information state (the game is Markov in it).
    pub fn observation_string(&self, player: PlayerId) -> Result<String> {
        self.information_state_string(player)
    }

    /// Observation tensor; identical to the information-state tensor.
    pub fn observation_tensor(&self, player: PlayerId) -> Result<Vec<f32>> {
        self.information_state_tensor(player)
    }
}
