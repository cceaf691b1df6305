//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility.
//! Only consulted for limit-bounded walks; market orders cross any price.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be at or
/// above the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order limited to `incoming_price` can take a
/// resting order at `resting_price`
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Bid => can_match(incoming_price, resting_price),
        Side::Ask => can_match(resting_price, incoming_price),
    }
}
