//! Matching Engine Service
//!
//! Limit order book with price-time priority matching. Resting orders live
//! in an ID-keyed index while each price level queues order IDs in arrival
//! order, so cancels and fills never touch more than one level.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Level volume always equals the summed remaining size of its orders
//! - Empty price levels are evicted immediately
//! - Conservation of quantity: no order is ever filled past its size
//!
//! [`Orderbook`] is single-threaded; [`SharedOrderbook`] wraps it in a
//! reader-writer lock. [`Exchange`] runs one shared book per market and
//! hands executed trades to settlement.

pub mod book;
pub mod config;
pub mod engine;
pub mod exchange;
pub mod matching;
pub mod settlement;
pub mod tape;

pub use config::{ExchangeConfig, OrderbookConfig};
pub use engine::{BestQuote, LevelSnapshot, Orderbook, SharedOrderbook};
pub use exchange::{Exchange, OrderbookData, PlaceOrderRequest, PlaceOrderResponse};
pub use settlement::{SettlementQueue, SettlementSink, SettlementWorker};
