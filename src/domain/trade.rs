//! Orders and trades.
//!
//! A trade is an entry order optionally followed by an exit order. Trades
//! are long-only: the entry buys, the exit sells.

use chrono::NaiveDateTime;

use super::error::StochtraderError;
use super::num::Num;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub index: usize,
    pub price: Num,
    pub amount: Num,
    pub timestamp: Option<NaiveDateTime>,
}

impl Order {
    pub fn new(index: usize, price: Num, amount: Num, timestamp: Option<NaiveDateTime>) -> Self {
        Order {
            index,
            price,
            amount,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trade {
    entry: Option<Order>,
    exit: Option<Order>,
}

impl Trade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<&Order> {
        self.entry.as_ref()
    }

    pub fn exit(&self) -> Option<&Order> {
        self.exit.as_ref()
    }

    /// No order yet.
    pub fn is_new(&self) -> bool {
        self.entry.is_none()
    }

    /// Entered, not yet exited.
    pub fn is_opened(&self) -> bool {
        self.entry.is_some() && self.exit.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.exit.is_some()
    }

    pub(crate) fn open(&mut self, order: Order) -> Result<(), StochtraderError> {
        if !self.is_new() {
            return Err(StochtraderError::InvalidOrder {
                reason: format!("trade already entered, cannot enter again at {}", order.index),
            });
        }
        self.entry = Some(order);
        Ok(())
    }

    pub(crate) fn close(&mut self, order: Order) -> Result<(), StochtraderError> {
        let entry = match (&self.entry, &self.exit) {
            (Some(entry), None) => entry,
            _ => {
                return Err(StochtraderError::InvalidOrder {
                    reason: format!("no open trade to exit at {}", order.index),
                });
            }
        };
        if order.index <= entry.index {
            return Err(StochtraderError::InvalidOrder {
                reason: format!(
                    "exit index {} must be after entry index {}",
                    order.index, entry.index
                ),
            });
        }
        self.exit = Some(order);
        Ok(())
    }

    /// exit price / entry price for a closed trade, NaN otherwise.
    pub fn profit_ratio(&self) -> Num {
        match (&self.entry, &self.exit) {
            (Some(entry), Some(exit)) => exit.price / entry.price,
            _ => Num::NaN,
        }
    }

    /// Number of ticks spanned by a closed trade, both ends included.
    pub fn tick_count(&self) -> Option<usize> {
        match (&self.entry, &self.exit) {
            (Some(entry), Some(exit)) => Some(exit.index - entry.index + 1),
            _ => None,
        }
    }
}
