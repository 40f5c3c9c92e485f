//! High-low trading game core.
//!
//! This crate provides:
//! - Lehmer-code permutation ranking (`perm`)
//! - The phase-dependent action codec (`ActionCodec`)
//! - The game state machine (`GameState`) with the matching engine wired in
//! - Per-player observations, string and tensor form
//! - The host-framework surface (`HighLowTradingGame`) and an explicit loader
//!
//! A game runs as: chance draws two candidate contract values, the high/low
//! flag, a role permutation, and one target per customer; players then quote
//! two-sided markets in round-robin order; terminal returns settle positions
//! at the realized value, with a linear penalty for customers that miss
//! their targets.

mod codec;
mod error;
mod game;
mod observer;
pub mod perm;
mod registry;
mod state;

pub use codec::ActionCodec;
pub use error::{GameError, Result};
pub use game::{GAME_NAME, HighLowTradingGame};
pub use registry::{load_game, registered_games};
pub use state::GameState;
