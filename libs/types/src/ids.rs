//! Unique identifier types for exchange entities
//!
//! Order IDs come from a process-wide monotonic counter so that arrival order
//! can be read straight off the ID. Trade IDs use UUID v7 for time-sortable
//! ordering across processes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::errors::InvalidMarketId;

/// Next order ID to hand out. Starts at 1 so that 0 never names an order.
static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an order
///
/// Assigned once at creation and never reused within the process. IDs
/// increase strictly in allocation order, from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Allocate the next OrderId from the process-wide counter
    pub fn new() -> Self {
        Self(NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw ID, e.g. one parsed from a request path
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade (one per match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user owning an order
///
/// Opaque to the engine; the registry that issues these lives outside it
/// (e.g. "CSD000000000001-0001").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Market identifier (listed security against its quote currency)
///
/// Format: "BASE/QUOTE" (e.g., "INN/ZSX"). Deserialization enforces the
/// format as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketId(String);

impl MarketId {
    /// Create a new MarketId from a string
    ///
    /// # Panics
    /// Panics if the format is invalid (must contain '/')
    pub fn new(symbol: impl Into<String>) -> Self {
        let s = symbol.into();
        assert!(s.contains('/'), "MarketId must be in BASE/QUOTE format");
        Self(s)
    }

    /// Try to create a MarketId, returning None if invalid
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        Self::try_from(symbol.into()).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into base and quote symbols
    pub fn split(&self) -> (&str, &str) {
        self.0.split_once('/').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl TryFrom<String> for MarketId {
    type Error = InvalidMarketId;

    fn try_from(symbol: String) -> Result<Self, Self::Error> {
        if symbol.contains('/') {
            Ok(Self(symbol))
        } else {
            Err(InvalidMarketId { symbol })
        }
    }
}

impl From<MarketId> for String {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_monotonic() {
        let id1 = OrderId::new();
        let id2 = OrderId::new();
        assert!(id2 > id1, "OrderIds must increase in allocation order");
    }

    #[test]
    fn test_order_id_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| OrderId::new()).collect::<Vec<_>>()))
            .collect();

        let mut all: Vec<OrderId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_order_id_serialization() {
        let id = OrderId::from_raw(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_trade_id_creation() {
        let id1 = TradeId::new();
        let id2 = TradeId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_user_id_display() {
        let user = UserId::new("CSD000000000001-0001");
        assert_eq!(user.to_string(), "CSD000000000001-0001");
        assert_eq!(UserId::from("A"), UserId::new("A"));
    }

    #[test]
    fn test_market_id_creation() {
        let market = MarketId::new("INN/ZSX");
        assert_eq!(market.as_str(), "INN/ZSX");

        let (base, quote) = market.split();
        assert_eq!(base, "INN");
        assert_eq!(quote, "ZSX");
    }

    #[test]
    fn test_market_id_try_new() {
        assert!(MarketId::try_new("INN/ZSX").is_some());
        assert!(MarketId::try_new("INVALID").is_none());
    }

    #[test]
    fn test_market_id_deserialization_checks_format() {
        let market: MarketId = serde_json::from_str("\"INN/ZSX\"").unwrap();
        assert_eq!(market, MarketId::new("INN/ZSX"));
        assert_eq!(serde_json::to_string(&market).unwrap(), "\"INN/ZSX\"");

        let err = serde_json::from_str::<MarketId>("\"INNZSX\"").unwrap_err();
        assert!(err.to_string().contains("expected BASE/QUOTE"));
    }

    #[test]
    #[should_panic(expected = "MarketId must be in BASE/QUOTE format")]
    fn test_market_id_invalid_format() {
        MarketId::new("INVALID");
    }
}
