//! Match record generation
//!
//! Turns a single fill into a `Match` and numbers it for the trade tape.

use types::numeric::{Price, Quantity};
use types::order::Order;
use types::trade::Match;

/// Match executor for producing sequenced match records
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Sequence number the next match will receive
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Record a fill of `size` between a resting and an incoming order
    ///
    /// `price` is the resting order's level price.
    pub fn execute_match(
        &mut self,
        resting: &Order,
        incoming: &Order,
        size: Quantity,
        price: Price,
        timestamp: i64,
    ) -> Match {
        let sequence = self.next_sequence();
        Match::new(sequence, resting, incoming, size, price, timestamp)
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::order::Side;

    fn order(user: &str, side: Side) -> Order {
        Order::new(UserId::new(user), side, Quantity::from_u64(1), 1708123456789000000)
    }

    #[test]
    fn test_execute_match() {
        let mut executor = MatchExecutor::new(1000);
        let resting = order("A", Side::Ask);
        let incoming = order("B", Side::Bid);

        let m = executor.execute_match(
            &resting,
            &incoming,
            Quantity::from_str("0.5").unwrap(),
            Price::from_u64(50000),
            1708123456789000000,
        );

        assert_eq!(m.sequence, 1000);
        assert_eq!(m.price, Price::from_u64(50000));
        assert_eq!(m.size_filled, Quantity::from_str("0.5").unwrap());
        assert_eq!(m.ask.order_id, resting.order_id);
    }

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = MatchExecutor::default();
        let resting = order("A", Side::Bid);
        let incoming = order("B", Side::Ask);

        let m1 = executor.execute_match(&resting, &incoming, Quantity::from_u64(1), Price::from_u64(10), 0);
        let m2 = executor.execute_match(&resting, &incoming, Quantity::from_u64(1), Price::from_u64(10), 0);

        assert_eq!(m1.sequence, 1);
        assert_eq!(m2.sequence, 2);
        assert_eq!(executor.peek_sequence(), 3);
    }
}
