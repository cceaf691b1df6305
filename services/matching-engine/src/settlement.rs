//! Settlement hand-off
//!
//! Matches leave the book as settlement instructions on a bounded channel.
//! A worker task drains the channel and passes each instruction to a
//! `SettlementSink`, which performs the actual transfer on the ledger. The
//! book never waits on settlement, and a failed transfer is reported by the
//! worker without being retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use types::errors::SettlementError;
use types::ids::{MarketId, TradeId, UserId};
use types::numeric::{Price, Quantity};
use types::trade::Match;

/// Transfer of `amount` units of a market's security from seller to buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    pub trade_id: TradeId,
    pub market: MarketId,
    /// Ask user (seller)
    pub from: UserId,
    /// Bid user (buyer)
    pub to: UserId,
    pub amount: Quantity,
    pub price: Price,
}

impl SettlementInstruction {
    pub fn from_match(market: &MarketId, m: &Match) -> Self {
        Self {
            trade_id: m.trade_id,
            market: market.clone(),
            from: m.ask.user_id.clone(),
            to: m.bid.user_id.clone(),
            amount: m.size_filled,
            price: m.price,
        }
    }
}

/// Performs settlement transfers
#[async_trait]
pub trait SettlementSink: Send + Sync {
    async fn transfer(&self, instruction: &SettlementInstruction) -> Result<(), SettlementError>;
}

/// Sending half of the settlement channel
#[derive(Debug, Clone)]
pub struct SettlementQueue {
    tx: mpsc::Sender<SettlementInstruction>,
}

impl SettlementQueue {
    /// Create a queue holding at most `capacity` pending instructions, and
    /// the worker that drains it
    pub fn channel(capacity: usize) -> (Self, SettlementWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, SettlementWorker { rx })
    }

    /// Enqueue without waiting
    ///
    /// Safe to call from synchronous code; fails rather than blocks when the
    /// worker is behind.
    pub fn submit(&self, instruction: SettlementInstruction) -> Result<(), SettlementError> {
        self.tx.try_send(instruction).map_err(|err| match err {
            TrySendError::Full(_) => SettlementError::QueueFull,
            TrySendError::Closed(_) => SettlementError::QueueClosed,
        })
    }
}

/// Totals reported by a worker when its queue closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementStats {
    pub settled: u64,
    pub failed: u64,
}

/// Receiving half of the settlement channel
#[derive(Debug)]
pub struct SettlementWorker {
    rx: mpsc::Receiver<SettlementInstruction>,
}

impl SettlementWorker {
    /// Settle instructions until every `SettlementQueue` has been dropped
    pub async fn run<S: SettlementSink>(mut self, sink: S) -> SettlementStats {
        let mut stats = SettlementStats::default();

        while let Some(instruction) = self.rx.recv().await {
            match sink.transfer(&instruction).await {
                Ok(()) => {
                    stats.settled += 1;
                    debug!(
                        trade_id = %instruction.trade_id,
                        from = %instruction.from,
                        to = %instruction.to,
                        amount = %instruction.amount,
                        "Settled trade"
                    );
                }
                Err(err) => {
                    stats.failed += 1;
                    warn!(
                        trade_id = %instruction.trade_id,
                        from = %instruction.from,
                        to = %instruction.to,
                        amount = %instruction.amount,
                        error = %err,
                        "Settlement transfer failed"
                    );
                }
            }
        }

        info!(settled = stats.settled, failed = stats.failed, "Settlement worker stopped");
        stats
    }
}
