//! Match records
//!
//! A match is one execution between a resting order and an incoming order.
//! It names the two orders by side (ask = seller, bid = buyer) rather than by
//! maker/taker role, which is what settlement needs: securities move from the
//! ask user to the bid user.

use crate::ids::{OrderId, TradeId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::{Order, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One order's participation in a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRef {
    pub order_id: OrderId,
    pub user_id: UserId,
}

impl From<&Order> for OrderRef {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            user_id: order.user_id.clone(),
        }
    }
}

/// Immutable record of one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub trade_id: TradeId,
    pub sequence: u64, // Position on the book's trade tape, from 1
    pub ask: OrderRef,
    pub bid: OrderRef,
    /// Side of the incoming order
    pub taker_side: Side,
    pub size_filled: Quantity,
    /// Execution price: always the resting order's price
    pub price: Price,
    pub executed_at: i64, // Unix nanos
}

impl Match {
    /// Build a match between a resting order and an incoming order
    pub fn new(
        sequence: u64,
        resting: &Order,
        incoming: &Order,
        size_filled: Quantity,
        price: Price,
        executed_at: i64,
    ) -> Self {
        let (ask, bid) = match incoming.side {
            Side::Bid => (OrderRef::from(resting), OrderRef::from(incoming)),
            Side::Ask => (OrderRef::from(incoming), OrderRef::from(resting)),
        };

        Self {
            trade_id: TradeId::new(),
            sequence,
            ask,
            bid,
            taker_side: incoming.side,
            size_filled,
            price,
            executed_at,
        }
    }

    /// The resting order that provided liquidity
    pub fn maker(&self) -> &OrderRef {
        match self.taker_side {
            Side::Bid => &self.ask,
            Side::Ask => &self.bid,
        }
    }

    /// The incoming order that took liquidity
    pub fn taker(&self) -> &OrderRef {
        match self.taker_side {
            Side::Bid => &self.bid,
            Side::Ask => &self.ask,
        }
    }

    /// Trade value (price × size)
    pub fn trade_value(&self) -> Decimal {
        self.size_filled.as_decimal() * self.price.as_decimal()
    }
}
