//! Order types
//!
//! An order is created when a limit or market request arrives, loses size as
//! it is filled, and leaves the book once filled or cancelled.

use crate::ids::{OrderId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    pub fn is_bid(&self) -> bool {
        matches!(self, Side::Bid)
    }
}

/// How an order is to be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at a fixed price until matched or cancelled
    Limit,
    /// Takes the best available opposing prices immediately, never rests
    Market,
}

/// A single buy or sell instruction
///
/// `price` is set when the order is placed as a limit order; market orders
/// carry no price because they execute at the resting orders' prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub price: Option<Price>,
    pub size: Quantity,
    pub remaining_size: Quantity,
    pub created_at: i64, // Unix nanos
}

impl Order {
    /// Create a new order with a freshly allocated ID
    pub fn new(user_id: UserId, side: Side, size: Quantity, timestamp: i64) -> Self {
        Self {
            order_id: OrderId::new(),
            user_id,
            side,
            price: None,
            size,
            remaining_size: size,
            created_at: timestamp,
        }
    }

    /// Check size invariant: 0 <= remaining <= size
    pub fn check_invariant(&self) -> bool {
        !self.remaining_size.as_decimal().is_sign_negative() && self.remaining_size <= self.size
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_size.is_zero()
    }

    /// Size executed so far
    pub fn filled_size(&self) -> Quantity {
        self.size
            .checked_sub(self.remaining_size)
            .unwrap_or(Quantity::zero())
    }

    /// Limit if a price has been assigned, otherwise market
    pub fn order_type(&self) -> OrderType {
        match self.price {
            Some(_) => OrderType::Limit,
            None => OrderType::Market,
        }
    }

    /// Reduce the remaining size by `fill`
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining size. Callers compute fills
    /// as the minimum of both sides' remaining sizes, so this is a bug.
    pub fn add_fill(&mut self, fill: Quantity) {
        self.remaining_size = match self.remaining_size.checked_sub(fill) {
            Some(remaining) => remaining,
            None => panic!(
                "Fill would exceed remaining size: order {} has {}, fill {}",
                self.order_id, self.remaining_size, fill
            ),
        };

        debug_assert!(self.check_invariant(), "Invariant violated after fill");
    }
}
