//! Trading record: closed trades plus the current one.

use chrono::NaiveDateTime;

use super::error::StochtraderError;
use super::num::Num;
use super::trade::{Order, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Orders alternate entry/exit in index order and at most one trade is open.
/// An entry may share the index of the exit immediately before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingRecord {
    trades: Vec<Trade>,
    current: Trade,
}

impl TradingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(
        &mut self,
        index: usize,
        price: Num,
        amount: Num,
        timestamp: Option<NaiveDateTime>,
    ) -> Result<(), StochtraderError> {
        if let Some(last_exit) = self.last_exit() {
            if index < last_exit.index {
                return Err(StochtraderError::InvalidOrder {
                    reason: format!(
                        "entry index {} precedes last exit index {}",
                        index, last_exit.index
                    ),
                });
            }
        }
        self.current
            .open(Order::new(index, price, amount, timestamp))
    }

    pub fn exit(
        &mut self,
        index: usize,
        price: Num,
        amount: Num,
        timestamp: Option<NaiveDateTime>,
    ) -> Result<(), StochtraderError> {
        self.current
            .close(Order::new(index, price, amount, timestamp))?;
        self.trades.push(std::mem::take(&mut self.current));
        Ok(())
    }

    pub fn position(&self) -> PositionState {
        if self.current.is_opened() {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position() == PositionState::Flat
    }

    pub fn current_trade(&self) -> &Trade {
        &self.current
    }

    /// Closed trades, in order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    pub fn last_trade(&self) -> Option<&Trade> {
        self.trades.last()
    }

    pub fn last_entry(&self) -> Option<&Order> {
        self.current
            .entry()
            .or_else(|| self.trades.last().and_then(Trade::entry))
    }

    pub fn last_exit(&self) -> Option<&Order> {
        self.trades.last().and_then(Trade::exit)
    }
}
