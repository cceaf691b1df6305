//! Matching logic module
//!
//! Implements the price-time priority walk over the opposing side of the
//! book, plus the helpers it is built from.

pub mod crossing;
pub mod executor;
pub mod walk;

pub use crossing::can_match;
pub use executor::MatchExecutor;
