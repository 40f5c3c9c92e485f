//! Shared data model for the high-low trading game.
//!
//! This crate provides the types every other crate speaks in: id and money
//! newtypes, orders and fills for the matching engine, the structured action
//! vocabulary of the game, and the validated game configuration.

mod action;
mod config;
mod fill;
mod ids;
mod money;
mod order;
mod position;

pub use action::{Actor, Phase, Quote, Role, RoleAssignment, StructuredAction};
pub use config::{ConfigError, GameConfig, GameParameters};
pub use fill::Fill;
pub use ids::{ActionId, MoveNumber, OrderId, PlayerId};
pub use money::{Cash, Price, Quantity};
pub use order::{OrderEntry, OrderSide};
pub use position::PlayerPosition;
