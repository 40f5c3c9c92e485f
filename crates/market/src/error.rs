//! Error types for market operations.

use std::fmt;
use types::OrderId;

/// Result type for market operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur while matching orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketError {
    /// Two crossing orders carried the same id. Ids are the time-priority
    /// key, so this can only happen when the caller breaks the
    /// strictly-increasing id contract.
    DuplicateOrderId(OrderId),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::DuplicateOrderId(id) => {
                write!(f, "crossing orders share the id {}", id)
            }
        }
    }
}

impl std::error::Error for MarketError {}
