//! Types library for the stock exchange order book
//!
//! This library provides the core type definitions shared between the
//! matching engine and the services that sit around it, so that every layer
//! agrees on identifiers, decimal arithmetic and error taxonomy.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, TradeId, UserId, MarketId)
//! - `numeric`: Decimal newtypes (Price, Quantity)
//! - `order`: Order, side and order type
//! - `trade`: Match records produced by the matching engine
//! - `clock`: Timestamp sources
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod clock;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
}
