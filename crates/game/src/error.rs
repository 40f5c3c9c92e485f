//! Error types for the game core.
//!
//! The game is a pure computation: every contract violation surfaces as a
//! typed error and leaves the state untouched. Nothing here is recoverable
//! from inside the engine; upstream drivers may catch and re-prompt.

use market::MarketError;
use std::fmt;
use types::{ActionId, ConfigError, Phase, PlayerId, Quote};

/// Result type for game operations.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors produced by the codec, the state machine, and the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A raw action outside the phase's legal range.
    InvalidAction {
        phase: Phase,
        action: ActionId,
        max: ActionId,
    },
    /// An operation that does not exist in the given phase, e.g. decoding an
    /// action at terminal or encoding a structured action of the wrong kind.
    PhaseMismatch { phase: Phase },
    /// A permutation rank at or above `n!`.
    PermutationRank { rank: u64, n: usize },
    /// A sequence that is not a permutation of `[0, n)`.
    NotAPermutation(Vec<usize>),
    /// A contract value outside `[1, max_contract_value]`.
    ValueOutOfRange(i64),
    /// A customer target of zero; targets are always nonzero.
    ZeroTarget,
    /// A customer target whose magnitude exceeds `customer_max_size`.
    TargetOutOfRange(i64),
    /// A quote with a size above the per-trade cap or a price outside
    /// `[1, max_contract_value]`.
    QuoteOutOfRange(Quote),
    /// A player id at or above `num_players`.
    InvalidPlayer(PlayerId),
    /// `chance_outcomes` queried while no chance node is up.
    NotChanceNode,
    /// `returns` queried before the game ended.
    NotTerminal,
    /// Settlement queried before both values and the high/low flag exist.
    SettlementPending,
    /// Undo requested on a fresh state.
    EmptyHistory,
    /// `load_game` with a name nothing answers to.
    UnknownGame(String),
    /// Invalid game configuration.
    Config(ConfigError),
    /// The matching engine rejected an order.
    Market(MarketError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidAction { phase, action, max } => {
                write!(
                    f,
                    "action {} outside the {} range [0, {}]",
                    action, phase, max
                )
            }
            GameError::PhaseMismatch { phase } => {
                write!(f, "operation not available in phase {}", phase)
            }
            GameError::PermutationRank { rank, n } => {
                write!(f, "permutation rank {} out of range for {} elements", rank, n)
            }
            GameError::NotAPermutation(seq) => {
                write!(f, "sequence {:?} is not a permutation", seq)
            }
            GameError::ValueOutOfRange(value) => {
                write!(f, "contract value {} out of range", value)
            }
            GameError::ZeroTarget => write!(f, "customer target size cannot be zero"),
            GameError::TargetOutOfRange(size) => {
                write!(f, "customer target size {} out of range", size)
            }
            GameError::QuoteOutOfRange(quote) => {
                write!(f, "quote {} outside the configured bounds", quote)
            }
            GameError::InvalidPlayer(player) => write!(f, "no such player: {}", player),
            GameError::NotChanceNode => {
                write!(f, "chance outcomes are only defined at chance nodes")
            }
            GameError::NotTerminal => {
                write!(f, "returns are only defined at terminal states")
            }
            GameError::SettlementPending => {
                write!(f, "settlement value is not determined yet")
            }
            GameError::EmptyHistory => write!(f, "no action to undo"),
            GameError::UnknownGame(name) => write!(f, "unknown game: {}", name),
            GameError::Config(err) => err.fmt(f),
            GameError::Market(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(err) => Some(err),
            GameError::Market(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

impl From<MarketError> for GameError {
    fn from(err: MarketError) -> Self {
        GameError::Market(err)
    }
}
