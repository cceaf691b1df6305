//! One side of the order book (bids or asks)
//!
//! Price levels are kept in a BTreeMap for deterministic iteration. The map
//! is always ascending; the side decides which end is "best". That choice in
//! `best`, `best_mut` and `levels` is the only place where bids and asks
//! differ, everything above this module is written once for both sides.

use std::collections::btree_map::{self, BTreeMap};
use std::iter::Rev;
use types::numeric::{Price, Quantity};
use types::order::Side;

use super::price_level::PriceLevel;

/// Price-indexed levels for one side of the book
///
/// Bids are in priority order from highest price down, asks from lowest
/// price up. Every price key maps to a non-empty level once the owning book
/// has finished an operation.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    /// Create a new empty side
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Get the level with the best price, if any
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        }
    }

    /// Get mutable reference to the best level
    pub(crate) fn best_mut(&mut self) -> Option<&mut PriceLevel> {
        match self.side {
            Side::Bid => self.levels.values_mut().next_back(),
            Side::Ask => self.levels.values_mut().next(),
        }
    }

    pub fn best_price(&self) -> Option<Price> {
        self.best().map(PriceLevel::price)
    }

    /// Levels from best to worst price
    ///
    /// Lazy: callers that only need the top of the book stop early without
    /// visiting the rest. Call again to restart from the current best.
    pub fn levels(&self) -> Levels<'_> {
        let values = self.levels.values();
        match self.side {
            Side::Bid => Levels::Descending(values.rev()),
            Side::Ask => Levels::Ascending(values),
        }
    }

    /// Get the level at an exact price
    pub fn level_at(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub(crate) fn level_at_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Get the level at `price`, creating an empty one if needed
    pub fn get_or_create(&mut self, price: Price) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Drop the level at `price` if it has no orders left
    ///
    /// Returns true if a level was removed.
    pub fn evict_if_empty(&mut self, price: Price) -> bool {
        match self.levels.get(&price) {
            Some(level) if level.is_empty() => {
                self.levels.remove(&price);
                true
            }
            _ => false,
        }
    }

    /// Sum of the volumes of every level on this side
    pub fn total_volume(&self) -> Quantity {
        self.levels.values().map(PriceLevel::volume).sum()
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels()
            .take(depth)
            .map(|level| (level.price(), level.volume()))
            .collect()
    }

    /// Check if the side is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total number of resting orders on this side
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::order_count).sum()
    }
}

/// Iterator over a side's levels in priority order
pub enum Levels<'a> {
    Ascending(btree_map::Values<'a, Price, PriceLevel>),
    Descending(Rev<btree_map::Values<'a, Price, PriceLevel>>),
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a PriceLevel;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Levels::Ascending(iter) => iter.next(),
            Levels::Descending(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Levels::Ascending(iter) => iter.size_hint(),
            Levels::Descending(iter) => iter.size_hint(),
        }
    }
}
