//! Configuration for the order book and the exchange facade

use serde::Deserialize;
use types::ids::MarketId;

/// Behaviour switches for a single order book
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderbookConfig {
    /// Match a limit order against the opposing side before resting it when
    /// its price crosses the spread. Off by default: limit orders rest
    /// unconditionally.
    pub cross_marketable_limits: bool,
}

/// Configuration for the exchange facade
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Markets to open a book for at startup
    pub markets: Vec<MarketId>,
    /// Settings applied to every market's book
    pub orderbook: OrderbookConfig,
    /// Maximum number of settlement instructions waiting for the worker
    pub settlement_queue_capacity: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            markets: vec![MarketId::new("INN/ZSX")],
            orderbook: OrderbookConfig::default(),
            settlement_queue_capacity: 1024,
        }
    }
}
