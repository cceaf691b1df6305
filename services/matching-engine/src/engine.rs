//! Order book core
//!
//! `Orderbook` owns both sides, the order index and the trade tape, and runs
//! placement, cancellation and queries against them. It is a plain
//! single-threaded structure; `SharedOrderbook` wraps it in a reader-writer
//! lock for use from concurrent request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use rust_decimal::Decimal;
use serde::Serialize;
use types::clock::{Clock, SystemClock};
use types::errors::BookError;
use types::ids::{OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Match;

use crate::book::{BookSide, PriceLevel};
use crate::config::OrderbookConfig;
use crate::matching::{walk, MatchExecutor};
use crate::tape::TradeTape;

/// Order book for a single market
///
/// Resting orders are owned by `orders`; price levels only queue their IDs.
/// A resting order's `side` and `price` are the key of the level it sits on.
pub struct Orderbook {
    config: OrderbookConfig,
    clock: Arc<dyn Clock>,
    bids: BookSide,
    asks: BookSide,
    /// Every resting order, by ID
    orders: HashMap<OrderId, Order>,
    executor: MatchExecutor,
    tape: TradeTape,
}

/// One price level as seen by readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSnapshot {
    pub price: Price,
    pub volume: Quantity,
    /// Resting orders in priority order
    pub orders: Vec<Order>,
}

/// Head of the best level on one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestQuote {
    pub price: Price,
    pub order_id: OrderId,
    pub user_id: UserId,
    /// Volume of the whole level, not just the head order
    pub volume: Quantity,
}

impl Orderbook {
    /// Create an empty book with default settings and the wall clock
    pub fn new() -> Self {
        Self::with_config(OrderbookConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(config: OrderbookConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            orders: HashMap::new(),
            executor: MatchExecutor::default(),
            tape: TradeTape::new(),
        }
    }

    pub fn config(&self) -> &OrderbookConfig {
        &self.config
    }

    /// Rest a limit order at `price`
    ///
    /// By default the order rests without looking at the opposing side, even
    /// when `price` crosses the spread, and the returned list is empty. With
    /// `cross_marketable_limits` the order first takes opposing liquidity up
    /// to its price and only the remainder rests.
    pub fn place_limit_order(&mut self, price: Price, mut order: Order) -> Result<Vec<Match>, BookError> {
        if !price.is_positive() {
            return Err(BookError::invalid(format!("price must be positive, got {price}")));
        }
        Self::validate_size(&order)?;
        if self.orders.contains_key(&order.order_id) {
            return Err(BookError::invalid(format!(
                "order {} is already resting",
                order.order_id
            )));
        }

        order.price = Some(price);

        let matches = if self.config.cross_marketable_limits {
            self.execute(&mut order, Some(price))
        } else {
            Vec::new()
        };

        if !order.is_filled() {
            let side = match order.side {
                Side::Bid => &mut self.bids,
                Side::Ask => &mut self.asks,
            };
            side.get_or_create(price).insert(&order);
            self.orders.insert(order.order_id, order);
        }

        Ok(matches)
    }

    /// Execute a market order against the opposing side
    ///
    /// Fills walk the opposing levels from the best price outward and each
    /// level from its oldest order. Running out of liquidity is not an error:
    /// the order's `remaining_size` shows what was left unfilled, and that
    /// remainder never rests.
    pub fn place_market_order(&mut self, order: &mut Order) -> Result<Vec<Match>, BookError> {
        Self::validate_size(order)?;
        order.price = None;
        Ok(self.execute(order, None))
    }

    fn validate_size(order: &Order) -> Result<(), BookError> {
        if !order.size.is_positive() {
            return Err(BookError::invalid(format!("size must be positive, got {}", order.size)));
        }
        if !order.remaining_size.is_positive() || !order.check_invariant() {
            return Err(BookError::invalid(format!(
                "remaining size must be in (0, {}], got {}",
                order.size, order.remaining_size
            )));
        }
        Ok(())
    }

    fn execute(&mut self, incoming: &mut Order, limit: Option<Price>) -> Vec<Match> {
        let timestamp = self.clock.now_nanos();
        let opposing = match incoming.side {
            Side::Bid => &mut self.asks,
            Side::Ask => &mut self.bids,
        };

        let matches = walk::walk_opposing(
            opposing,
            &mut self.orders,
            &mut self.executor,
            incoming,
            limit,
            timestamp,
        );
        self.tape.extend(matches.iter().cloned());
        matches
    }

    /// Remove a resting order from the book
    ///
    /// Returns the order as it was at removal, including any partial fills.
    /// Cancelling an unknown or already cancelled order fails with
    /// `OrderNotFound` and changes nothing.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<Order, BookError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(BookError::OrderNotFound { order_id })?;
        let price = order.price.ok_or(BookError::OrderNotFound { order_id })?;

        let side = match order.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        side.level_at_mut(price)
            .ok_or(BookError::OrderNotOnLevel { order_id, price })?
            .remove(order)?;
        side.evict_if_empty(price);

        self.orders
            .remove(&order_id)
            .ok_or(BookError::OrderNotFound { order_id })
    }

    /// The side holding orders of `side`
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub fn bid_total_volume(&self) -> Quantity {
        self.bids.total_volume()
    }

    pub fn ask_total_volume(&self) -> Quantity {
        self.asks.total_volume()
    }

    /// Bid levels, highest price first
    pub fn bids(&self) -> Vec<LevelSnapshot> {
        self.snapshot_side(&self.bids)
    }

    /// Ask levels, lowest price first
    pub fn asks(&self) -> Vec<LevelSnapshot> {
        self.snapshot_side(&self.asks)
    }

    fn snapshot_side(&self, side: &BookSide) -> Vec<LevelSnapshot> {
        side.levels().map(|level| self.snapshot_level(level)).collect()
    }

    fn snapshot_level(&self, level: &PriceLevel) -> LevelSnapshot {
        LevelSnapshot {
            price: level.price(),
            volume: level.volume(),
            orders: level
                .order_ids()
                .filter_map(|id| self.orders.get(&id).cloned())
                .collect(),
        }
    }

    pub fn best_bid(&self) -> Option<BestQuote> {
        self.best_quote(&self.bids)
    }

    pub fn best_ask(&self) -> Option<BestQuote> {
        self.best_quote(&self.asks)
    }

    fn best_quote(&self, side: &BookSide) -> Option<BestQuote> {
        let level = side.best()?;
        let head = self.orders.get(&level.front()?)?;
        Some(BestQuote {
            price: level.price(),
            order_id: head.order_id,
            user_id: head.user_id.clone(),
            volume: level.volume(),
        })
    }

    /// Best ask minus best bid, if both sides have orders
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.best_price()?;
        let ask = self.asks.best_price()?;
        Some(ask.as_decimal() - bid.as_decimal())
    }

    /// Every match since the book was created, oldest first
    pub fn trades(&self) -> Vec<Match> {
        self.tape.snapshot()
    }

    pub fn tape(&self) -> &TradeTape {
        &self.tape
    }

    /// Look up a resting order
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Resting orders owned by `user_id`, oldest first
    pub fn orders_for_user(&self, user_id: &UserId) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|order| &order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.order_id);
        orders
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle to an order book shared between request handlers
///
/// Placement and cancellation take the write lock for the whole operation,
/// so a matching walk never interleaves with another mutation. Queries take
/// the read lock. Nothing here blocks on I/O while a lock is held; callers
/// settle matches after the placement call has returned.
#[derive(Clone)]
pub struct SharedOrderbook {
    inner: Arc<RwLock<Orderbook>>,
}

impl SharedOrderbook {
    pub fn new(book: Orderbook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }

    pub fn place_limit_order(&self, price: Price, order: Order) -> Result<Vec<Match>, BookError> {
        self.inner.write().place_limit_order(price, order)
    }

    pub fn place_market_order(&self, order: &mut Order) -> Result<Vec<Match>, BookError> {
        self.inner.write().place_market_order(order)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> Result<Order, BookError> {
        self.inner.write().cancel_order(order_id)
    }

    pub fn best_bid(&self) -> Option<BestQuote> {
        self.inner.read().best_bid()
    }

    pub fn best_ask(&self) -> Option<BestQuote> {
        self.inner.read().best_ask()
    }

    pub fn bid_total_volume(&self) -> Quantity {
        self.inner.read().bid_total_volume()
    }

    pub fn ask_total_volume(&self) -> Quantity {
        self.inner.read().ask_total_volume()
    }

    pub fn bids(&self) -> Vec<LevelSnapshot> {
        self.inner.read().bids()
    }

    pub fn asks(&self) -> Vec<LevelSnapshot> {
        self.inner.read().asks()
    }

    pub fn trades(&self) -> Vec<Match> {
        self.inner.read().trades()
    }

    pub fn orders_for_user(&self, user_id: &UserId) -> Vec<Order> {
        self.inner.read().orders_for_user(user_id)
    }

    /// Hold the read lock across several queries for a consistent view
    pub fn read(&self) -> RwLockReadGuard<'_, Orderbook> {
        self.inner.read()
    }
}

impl Default for SharedOrderbook {
    fn default() -> Self {
        Self::new(Orderbook::new())
    }
}
