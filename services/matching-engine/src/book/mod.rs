//! Order book infrastructure module
//!
//! Contains price levels and the per-side price index.

pub mod price_level;
pub mod side;

pub use price_level::PriceLevel;
pub use side::{BookSide, Levels};
