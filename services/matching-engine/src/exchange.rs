//! Multi-market exchange facade
//!
//! Routes requests to the book for their market, turns raw matches into the
//! views request handlers return, and forwards matches to settlement once
//! the book lock has been released.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use types::clock::{Clock, SystemClock};
use types::errors::ExchangeError;
use types::ids::{MarketId, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::Match;

use crate::config::ExchangeConfig;
use crate::engine::{BestQuote, Orderbook, SharedOrderbook};
use crate::settlement::{SettlementInstruction, SettlementQueue, SettlementWorker};

/// Order placement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub user_id: UserId,
    pub order_type: OrderType,
    pub side: Side,
    pub size: Quantity,
    /// Required for limit orders, ignored for market orders
    #[serde(default)]
    pub price: Option<Price>,
    pub market: MarketId,
}

/// Result of a placement: the new order's ID and who it traded with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
    pub matches: Vec<MatchedOrder>,
    /// Trades that executed but could not be queued for settlement
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsettled: Vec<SettlementInstruction>,
}

/// The resting counterparty of one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedOrder {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub price: Price,
    pub size: Quantity,
}

impl From<&Match> for MatchedOrder {
    fn from(m: &Match) -> Self {
        let maker = m.maker();
        Self {
            user_id: maker.user_id.clone(),
            order_id: maker.order_id,
            price: m.price,
            size: m.size_filled,
        }
    }
}

/// A resting order flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    /// Remaining size
    pub size: Quantity,
    pub timestamp: i64,
}

impl OrderView {
    fn resting(order: &Order) -> Option<Self> {
        Some(Self {
            user_id: order.user_id.clone(),
            order_id: order.order_id,
            side: order.side,
            price: order.price?,
            size: order.remaining_size,
            timestamp: order.created_at,
        })
    }
}

/// Full depth of one market, one entry per resting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookData {
    pub total_bid_volume: Quantity,
    pub total_ask_volume: Quantity,
    /// Lowest price first
    pub asks: Vec<OrderView>,
    /// Highest price first
    pub bids: Vec<OrderView>,
}

/// A user's resting orders across all markets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserOrders {
    pub asks: Vec<OrderView>,
    pub bids: Vec<OrderView>,
}

/// Volume-weighted execution price, None when nothing filled
pub fn average_price(matches: &[Match]) -> Option<Price> {
    let size: Decimal = matches.iter().map(|m| m.size_filled.as_decimal()).sum();
    if size.is_zero() {
        return None;
    }
    let value: Decimal = matches.iter().map(Match::trade_value).sum();
    Some(Price::new(value / size))
}

/// One order book per market, plus the settlement hand-off
pub struct Exchange {
    books: HashMap<MarketId, SharedOrderbook>,
    clock: Arc<dyn Clock>,
    settlement: Option<SettlementQueue>,
}

impl Exchange {
    /// Open an empty book for every configured market
    pub fn new(config: &ExchangeConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ExchangeConfig, clock: Arc<dyn Clock>) -> Self {
        let books = config
            .markets
            .iter()
            .map(|market| {
                let book = Orderbook::with_config(config.orderbook.clone(), clock.clone());
                (market.clone(), SharedOrderbook::new(book))
            })
            .collect();

        info!(markets = config.markets.len(), "Exchange initialized");

        Self {
            books,
            clock,
            settlement: None,
        }
    }

    /// Open the configured markets with a settlement queue attached
    ///
    /// The returned worker must be run (e.g. spawned on a runtime) for
    /// matches to be settled.
    pub fn with_settlement(config: &ExchangeConfig, clock: Arc<dyn Clock>) -> (Self, SettlementWorker) {
        let (queue, worker) = SettlementQueue::channel(config.settlement_queue_capacity);
        let mut exchange = Self::with_clock(config, clock);
        exchange.settlement = Some(queue);
        (exchange, worker)
    }

    /// Attach a settlement queue
    pub fn set_settlement_queue(&mut self, queue: SettlementQueue) {
        self.settlement = Some(queue);
    }

    pub fn markets(&self) -> impl Iterator<Item = &MarketId> {
        self.books.keys()
    }

    /// The book for `market`
    pub fn book(&self, market: &MarketId) -> Result<&SharedOrderbook, ExchangeError> {
        self.books
            .get(market)
            .ok_or_else(|| ExchangeError::MarketNotFound {
                symbol: market.to_string(),
            })
    }

    /// Place a limit or market order
    pub fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, ExchangeError> {
        let book = self.book(&request.market)?;
        let mut order = Order::new(
            request.user_id,
            request.side,
            request.size,
            self.clock.now_nanos(),
        );
        let order_id = order.order_id;

        let matches = match request.order_type {
            OrderType::Limit => {
                let price = request.price.ok_or_else(|| ExchangeError::InvalidRequest {
                    reason: "limit order requires a price".to_string(),
                })?;
                let size = order.size;
                let matches = book.place_limit_order(price, order)?;
                debug!(
                    market = %request.market,
                    order_id = %order_id,
                    price = %price,
                    size = %size,
                    "Placed limit order"
                );
                matches
            }
            OrderType::Market => {
                let matches = book.place_market_order(&mut order)?;
                let filled = order.filled_size();
                match average_price(&matches) {
                    Some(avg_price) => info!(
                        market = %request.market,
                        order_id = %order_id,
                        size = %filled,
                        avg_price = %avg_price,
                        unfilled = %order.remaining_size,
                        "Filled market order"
                    ),
                    None => info!(
                        market = %request.market,
                        order_id = %order_id,
                        unfilled = %order.remaining_size,
                        "Market order found no liquidity"
                    ),
                }
                matches
            }
        };

        let unsettled = self.settle(&request.market, &matches);

        Ok(PlaceOrderResponse {
            order_id,
            matches: matches.iter().map(MatchedOrder::from).collect(),
            unsettled,
        })
    }

    /// Queue every match for settlement, returning the ones the queue refused
    fn settle(&self, market: &MarketId, matches: &[Match]) -> Vec<SettlementInstruction> {
        let Some(queue) = &self.settlement else {
            return Vec::new();
        };

        let mut unsettled = Vec::new();
        for m in matches {
            let instruction = SettlementInstruction::from_match(market, m);
            if let Err(err) = queue.submit(instruction.clone()) {
                error!(
                    market = %market,
                    trade_id = %m.trade_id,
                    error = %err,
                    "Could not queue trade for settlement"
                );
                unsettled.push(instruction);
            }
        }
        unsettled
    }

    /// Cancel a resting order
    pub fn cancel_order(&self, market: &MarketId, order_id: OrderId) -> Result<Order, ExchangeError> {
        let order = self.book(market)?.cancel_order(order_id)?;
        info!(market = %market, order_id = %order_id, "Order cancelled");
        Ok(order)
    }

    /// Volumes and every resting order of a market
    pub fn book_data(&self, market: &MarketId) -> Result<OrderbookData, ExchangeError> {
        let shared = self.book(market)?;
        let book = shared.read();

        let flatten = |side: Side| -> Vec<OrderView> {
            let levels = match side {
                Side::Bid => book.bids(),
                Side::Ask => book.asks(),
            };
            levels
                .iter()
                .flat_map(|level| level.orders.iter().filter_map(OrderView::resting))
                .collect()
        };

        Ok(OrderbookData {
            total_bid_volume: book.bid_total_volume(),
            total_ask_volume: book.ask_total_volume(),
            asks: flatten(Side::Ask),
            bids: flatten(Side::Bid),
        })
    }

    pub fn best_bid(&self, market: &MarketId) -> Result<Option<BestQuote>, ExchangeError> {
        Ok(self.book(market)?.best_bid())
    }

    pub fn best_ask(&self, market: &MarketId) -> Result<Option<BestQuote>, ExchangeError> {
        Ok(self.book(market)?.best_ask())
    }

    pub fn trades(&self, market: &MarketId) -> Result<Vec<Match>, ExchangeError> {
        Ok(self.book(market)?.trades())
    }

    /// Resting orders of `user_id` in every market, oldest first
    pub fn orders_for_user(&self, user_id: &UserId) -> UserOrders {
        let mut orders: Vec<Order> = self
            .books
            .values()
            .flat_map(|book| book.orders_for_user(user_id))
            .collect();
        orders.sort_by_key(|order| order.order_id);

        let mut result = UserOrders::default();
        for view in orders.iter().filter_map(OrderView::resting) {
            match view.side {
                Side::Bid => result.bids.push(view),
                Side::Ask => result.asks.push(view),
            }
        }
        result
    }
}
