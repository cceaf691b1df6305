//! Error types for the order book and the services around it
//!
//! Error taxonomy using thiserror. Invariant violations (over-filling an
//! order) are not represented here: they panic, see `Order::add_fill`.

use crate::ids::OrderId;
use crate::numeric::Price;
use thiserror::Error;

/// Errors returned by order book operations
///
/// Every variant is raised before the book is mutated, so a failed call
/// leaves the book exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    #[error("Order {order_id} is not on price level {price}")]
    OrderNotOnLevel { order_id: OrderId, price: Price },
}

impl BookError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        BookError::InvalidOrder {
            reason: reason.into(),
        }
    }
}

/// A market symbol that is not in BASE/QUOTE form
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid market id {symbol:?}: expected BASE/QUOTE")]
pub struct InvalidMarketId {
    pub symbol: String,
}

/// Errors returned by the multi-market exchange facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Book error: {0}")]
    Book(#[from] BookError),

    #[error("Market not found: {symbol}")]
    MarketNotFound { symbol: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Errors raised while handing matches to settlement
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("Settlement queue full")]
    QueueFull,

    #[error("Settlement queue closed")]
    QueueClosed,

    #[error("Settlement failed: {reason}")]
    TransferFailed { reason: String },
}
