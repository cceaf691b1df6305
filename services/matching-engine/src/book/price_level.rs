//! Price level implementation with FIFO queue
//!
//! A price level contains all orders resting at a specific price point.
//! Orders are kept in arrival order, which is also their time priority.
//! The level stores order IDs only; the orders themselves live in the
//! book's order index, and each resting order finds its way back here
//! through its side and price.

use std::collections::VecDeque;
use types::errors::BookError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

/// A price level containing orders at a specific price
///
/// `volume` always equals the sum of the remaining sizes of the queued
/// orders. It is adjusted on every insert, remove and fill and never
/// recomputed by scanning the queue.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<OrderId>,
    /// Total remaining size available at this level
    volume: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            volume: Quantity::zero(),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Insert an order at the back of the queue (time priority)
    pub fn insert(&mut self, order: &Order) {
        self.orders.push_back(order.order_id);
        self.volume += order.remaining_size;
    }

    /// Remove an order from the queue wherever it sits
    ///
    /// The level's volume drops by the order's remaining size at the time of
    /// removal, so partially filled orders only take their unfilled part.
    pub fn remove(&mut self, order: &Order) -> Result<(), BookError> {
        let position = self
            .orders
            .iter()
            .position(|id| *id == order.order_id)
            .ok_or(BookError::OrderNotOnLevel {
                order_id: order.order_id,
                price: self.price,
            })?;

        self.orders.remove(position);
        self.reduce_volume(order.remaining_size);
        Ok(())
    }

    /// Fill `size` of a resting order on this level
    ///
    /// Decrements both the order's remaining size and the level volume. An
    /// order that reaches zero is dropped from the queue; returns true in
    /// that case so the caller can drop it from the order index as well.
    ///
    /// # Panics
    /// Panics if `size` exceeds the order's remaining size.
    pub fn fill(&mut self, order: &mut Order, size: Quantity) -> bool {
        order.add_fill(size);
        self.reduce_volume(size);

        if !order.is_filled() {
            return false;
        }

        // Fills walk the queue from the head, so this is almost always index 0
        if let Some(position) = self.orders.iter().position(|id| *id == order.order_id) {
            self.orders.remove(position);
        }
        true
    }

    fn reduce_volume(&mut self, size: Quantity) {
        self.volume = match self.volume.checked_sub(size) {
            Some(volume) => volume,
            None => panic!(
                "Level {} volume {} is below removed size {}",
                self.price, self.volume, size
            ),
        };
    }

    /// Peek at the order with time priority
    pub fn front(&self) -> Option<OrderId> {
        self.orders.front().copied()
    }

    /// Order IDs in priority order
    pub fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.orders.iter().copied()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total remaining size at this price level
    pub fn volume(&self) -> Quantity {
        self.volume
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::order::Side;

    fn resting(size: &str) -> Order {
        let mut order = Order::new(
            UserId::new("A"),
            Side::Ask,
            Quantity::from_str(size).unwrap(),
            1708123456789000000,
        );
        order.price = Some(Price::from_u64(100));
        order
    }

    #[test]
    fn test_price_level_insert() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let order = resting("1.5");

        level.insert(&order);

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.volume(), Quantity::from_str("1.5").unwrap());
        assert!(!level.is_empty());
    }

    #[test]
    fn test_price_level_fifo_order() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let order1 = resting("1.0");
        let order2 = resting("2.0");
        let order3 = resting("3.0");

        level.insert(&order1);
        level.insert(&order2);
        level.insert(&order3);

        assert_eq!(level.front(), Some(order1.order_id));
        let ids: Vec<_> = level.order_ids().collect();
        assert_eq!(ids, vec![order1.order_id, order2.order_id, order3.order_id]);
    }

    #[test]
    fn test_price_level_remove_non_head() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let order1 = resting("1.0");
        let order2 = resting("2.0");
        let order3 = resting("3.0");

        level.insert(&order1);
        level.insert(&order2);
        level.insert(&order3);

        level.remove(&order2).unwrap();

        assert_eq!(level.order_count(), 2);
        assert_eq!(level.volume(), Quantity::from_u64(4));
        let ids: Vec<_> = level.order_ids().collect();
        assert_eq!(ids, vec![order1.order_id, order3.order_id]);
    }

    #[test]
    fn test_price_level_remove_absent() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let order = resting("1.0");

        let err = level.remove(&order).unwrap_err();
        assert_eq!(
            err,
            BookError::OrderNotOnLevel {
                order_id: order.order_id,
                price: Price::from_u64(100),
            }
        );
        assert_eq!(level.volume(), Quantity::zero());
    }

    #[test]
    fn test_price_level_remove_after_partial_fill() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let mut order = resting("5.0");
        level.insert(&order);

        level.fill(&mut order, Quantity::from_u64(2));
        level.remove(&order).unwrap();

        assert!(level.is_empty());
        assert_eq!(level.volume(), Quantity::zero());
    }

    #[test]
    fn test_price_level_partial_then_complete_fill() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let mut order = resting("5.0");
        level.insert(&order);

        // Partial fill
        let filled = level.fill(&mut order, Quantity::from_str("3.0").unwrap());
        assert!(!filled);
        assert_eq!(level.volume(), Quantity::from_str("2.0").unwrap());
        assert_eq!(order.remaining_size, Quantity::from_str("2.0").unwrap());
        assert_eq!(level.order_count(), 1);

        // Complete fill drops the order from the queue
        let filled = level.fill(&mut order, Quantity::from_str("2.0").unwrap());
        assert!(filled);
        assert!(level.is_empty());
        assert_eq!(level.volume(), Quantity::zero());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed remaining size")]
    fn test_price_level_overfill_panics() {
        let mut level = PriceLevel::new(Price::from_u64(100));
        let mut order = resting("1.0");
        level.insert(&order);

        level.fill(&mut order, Quantity::from_u64(2));
    }

    #[test]
    fn test_price_level_volume_invariant() {
        let mut level = PriceLevel::new(Price::from_u64(100));

        level.insert(&resting("1.5"));
        level.insert(&resting("2.5"));
        level.insert(&resting("3.0"));

        // Total should be sum of all remaining sizes
        assert_eq!(level.volume(), Quantity::from_str("7.0").unwrap());
    }
}
