//! Price-time priority walk over one side of the book

use std::collections::HashMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;
use types::trade::Match;

use super::crossing;
use super::executor::MatchExecutor;
use crate::book::BookSide;

/// Match `incoming` against `opposing`, best level first and FIFO within a
/// level, until it is filled, the side runs dry, or (with `limit`) the next
/// level no longer crosses.
///
/// Resting orders that fill are removed from their level and from `orders`;
/// levels that empty are evicted. Matches are returned in execution order.
pub(crate) fn walk_opposing(
    opposing: &mut BookSide,
    orders: &mut HashMap<OrderId, Order>,
    executor: &mut MatchExecutor,
    incoming: &mut Order,
    limit: Option<Price>,
    timestamp: i64,
) -> Vec<Match> {
    let mut matches = Vec::new();

    while !incoming.is_filled() {
        let Some(level) = opposing.best_mut() else {
            break;
        };
        let level_price = level.price();

        if let Some(limit) = limit {
            if !crossing::incoming_can_match(incoming.side, limit, level_price) {
                break;
            }
        }

        while !incoming.is_filled() {
            let Some(resting_id) = level.front() else {
                break;
            };
            let Some(resting) = orders.get_mut(&resting_id) else {
                panic!("Order {resting_id} queued at {level_price} is missing from the order index");
            };

            let fillable = incoming.remaining_size.min(resting.remaining_size);
            matches.push(executor.execute_match(resting, incoming, fillable, level_price, timestamp));

            let resting_filled = level.fill(resting, fillable);
            incoming.add_fill(fillable);

            if resting_filled {
                orders.remove(&resting_id);
            }
        }

        opposing.evict_if_empty(level_price);
    }

    matches
}
