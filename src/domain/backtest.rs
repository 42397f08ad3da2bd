//! Backtest runner.
//!
//! Walks a series once, in index order, asking the strategy at each index
//! whether to enter or exit. Orders are filled at the close of the index
//! that triggered them.

use tracing::{debug, info, warn};

use super::error::StochtraderError;
use super::num::Num;
use super::series::TimeSeries;
use super::strategy::Strategy;
use super::trading_record::{PositionState, TradingRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Quantity bought on entry and sold on exit.
    pub amount: Num,
    /// Close a trade still open after the last tick at that tick's close.
    pub force_close: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            amount: Num::ONE,
            force_close: false,
        }
    }
}

pub fn run_backtest(
    series: &TimeSeries,
    strategy: &Strategy,
    config: &BacktestConfig,
) -> Result<TradingRecord, StochtraderError> {
    if series.is_empty() {
        return Err(StochtraderError::EmptySeries);
    }
    if config.amount.is_nan() || config.amount <= Num::ZERO {
        return Err(StochtraderError::InvalidParameter {
            name: "amount",
            reason: format!("must be positive, got {}", config.amount),
        });
    }

    let mut record = TradingRecord::new();

    for (index, tick) in series.ticks().iter().enumerate() {
        match record.position() {
            PositionState::Flat => {
                if strategy.should_enter(index, Some(&record))? {
                    record.enter(index, tick.close, config.amount, Some(tick.end_time))?;
                    debug!(index, price = %tick.close, "entered long");
                }
            }
            PositionState::Long => {
                if strategy.should_exit(index, Some(&record))? {
                    record.exit(index, tick.close, config.amount, Some(tick.end_time))?;
                    debug!(index, price = %tick.close, "exited long");
                }
            }
        }
    }

    if config.force_close {
        close_open_trade(&mut record, series)?;
    }

    info!(
        strategy = %strategy.name,
        series = series.name(),
        ticks = series.len(),
        trades = record.trade_count(),
        open = !record.is_flat(),
        "backtest finished"
    );

    Ok(record)
}

/// Exits the open trade, if any, at the last tick's close. Returns whether a
/// trade was closed. A trade entered on the last tick cannot be exited there
/// and is left open.
pub fn close_open_trade(
    record: &mut TradingRecord,
    series: &TimeSeries,
) -> Result<bool, StochtraderError> {
    let Some(entry) = record.current_trade().entry().filter(|_| !record.is_flat()) else {
        return Ok(false);
    };
    let entry_index = entry.index;
    let amount = entry.amount;
    let last_index = series.end_index().ok_or(StochtraderError::EmptySeries)?;

    if entry_index >= last_index {
        warn!(entry_index, "trade entered on the last tick left open");
        return Ok(false);
    }

    let tick = series.tick(last_index)?;
    record.exit(last_index, tick.close, amount, Some(tick.end_time))?;
    warn!(
        entry_index,
        exit_index = last_index,
        price = %tick.close,
        "force-closed open trade"
    );
    Ok(true)
}
