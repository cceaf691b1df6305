//! Trade tape
//!
//! Append-only log of every match a book has produced, in execution order.
//! Readers get copies; nothing outside the owning book can change history.

use types::numeric::Price;
use types::trade::Match;

/// Append-only record of executed matches
#[derive(Debug, Clone, Default)]
pub struct TradeTape {
    matches: Vec<Match>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend<I: IntoIterator<Item = Match>>(&mut self, matches: I) {
        self.matches.extend(matches);
    }

    /// Copy of the full tape (oldest first)
    pub fn snapshot(&self) -> Vec<Match> {
        self.matches.clone()
    }

    /// Borrow the full tape (oldest first)
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Get recent matches (newest first)
    pub fn recent(&self, limit: usize) -> Vec<Match> {
        self.matches.iter().rev().take(limit).cloned().collect()
    }

    /// Matches with a sequence number greater than `sequence`
    pub fn since(&self, sequence: u64) -> Vec<Match> {
        // Sequences are assigned in append order, so the tape is sorted by them
        let start = self.matches.partition_point(|m| m.sequence <= sequence);
        self.matches[start..].to_vec()
    }

    /// Price of the most recent execution
    pub fn last_price(&self) -> Option<Price> {
        self.matches.last().map(|m| m.price)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::numeric::Quantity;
    use types::order::{Order, Side};

    fn make_match(sequence: u64, price: u64) -> Match {
        let ask = Order::new(UserId::new("A"), Side::Ask, Quantity::from_u64(1), 0);
        let bid = Order::new(UserId::new("B"), Side::Bid, Quantity::from_u64(1), 0);
        Match::new(
            sequence,
            &ask,
            &bid,
            Quantity::from_u64(1),
            Price::from_u64(price),
            1708123456789000000 + sequence as i64,
        )
    }

    fn tape_of(prices: &[u64]) -> TradeTape {
        let mut tape = TradeTape::new();
        tape.extend(
            prices
                .iter()
                .enumerate()
                .map(|(i, price)| make_match(i as u64 + 1, *price)),
        );
        tape
    }

    #[test]
    fn test_empty_tape() {
        let tape = TradeTape::new();
        assert!(tape.is_empty());
        assert!(tape.last_price().is_none());
        assert!(tape.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_is_in_execution_order() {
        let tape = tape_of(&[100, 101, 99]);

        let sequences: Vec<u64> = tape.snapshot().iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(tape.last_price(), Some(Price::from_u64(99)));
    }

    #[test]
    fn test_recent_ordering() {
        let tape = tape_of(&[100, 101, 102]);

        let recent = tape.recent(2);
        assert_eq!(recent.len(), 2);
        // Most recent first
        assert_eq!(recent[0].sequence, 3);
        assert_eq!(recent[1].sequence, 2);
    }

    #[test]
    fn test_since() {
        let tape = tape_of(&[100, 101, 102, 103]);

        let tail = tape.since(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].sequence, 3);
        assert!(tape.since(4).is_empty());
        assert_eq!(tape.since(0).len(), 4);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let tape = tape_of(&[100]);
        let mut copy = tape.snapshot();
        copy.clear();
        assert_eq!(tape.len(), 1);
    }
}
