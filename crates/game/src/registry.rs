//! Explicit game loading.
//!
//! Registration is a plain function call, not a static constructor: hosts
//! ask for a game by name and get a validated definition back or a typed
//! error.

use types::GameParameters;

use crate::error::{GameError, Result};
use crate::game::{GAME_NAME, HighLowTradingGame};

/// Short names this crate can load.
pub fn registered_games() -> &'static [&'static str] {
    &[GAME_NAME]
}

/// Load a game definition by short name.
pub fn load_game(name: &str, params: &GameParameters) -> Result<HighLowTradingGame> {
    match name {
        GAME_NAME => HighLowTradingGame::from_params(params),
        _ => Err(GameError::UnknownGame(name.to_string())),
    }
}
