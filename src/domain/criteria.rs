//! Analysis criteria computed over a series and its trading record.
//!
//! Every criterion is a pure function of its inputs: computing it twice over
//! the same record gives the same value. Only closed trades count unless a
//! criterion says otherwise, so an open final trade contributes nothing until
//! it is explicitly closed.

use super::error::StochtraderError;
use super::num::Num;
use super::series::TimeSeries;
use super::trade::Trade;
use super::trading_record::TradingRecord;

pub trait Criterion {
    fn name(&self) -> &'static str;

    fn calculate(
        &self,
        series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError>;

    fn calculate_trade(&self, series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError>;

    /// Whether `a` is a better result than `b`. Higher is better unless
    /// overridden.
    fn better_than(&self, a: Num, b: Num) -> bool {
        a > b
    }
}

/// Product of exit/entry price ratios over closed trades.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalProfitCriterion;

impl Criterion for TotalProfitCriterion {
    fn name(&self) -> &'static str {
        "Total profit"
    }

    fn calculate(
        &self,
        series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        record
            .trades()
            .iter()
            .try_fold(Num::ONE, |acc, t| Ok(acc * self.calculate_trade(series, t)?))
    }

    fn calculate_trade(&self, _series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        Ok(if trade.is_closed() {
            trade.profit_ratio()
        } else {
            Num::ONE
        })
    }
}

/// Number of closed trades, plus the current one when `include_open` is set
/// and it is open. Fewer trades rank better.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeCountCriterion {
    pub include_open: bool,
}

impl Criterion for TradeCountCriterion {
    fn name(&self) -> &'static str {
        "Number of trades"
    }

    fn calculate(
        &self,
        _series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        let open = usize::from(self.include_open && record.current_trade().is_opened());
        Ok(Num::from(record.trade_count() + open))
    }

    fn calculate_trade(&self, _series: &TimeSeries, _trade: &Trade) -> Result<Num, StochtraderError> {
        Ok(Num::ONE)
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a < b
    }
}

/// Ticks spent in closed trades, both ends included.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberOfTicksCriterion;

impl Criterion for NumberOfTicksCriterion {
    fn name(&self) -> &'static str {
        "Number of ticks"
    }

    fn calculate(
        &self,
        _series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        let ticks: usize = record.trades().iter().filter_map(Trade::tick_count).sum();
        Ok(Num::from(ticks))
    }

    fn calculate_trade(&self, _series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        Ok(Num::from(trade.tick_count().unwrap_or(0)))
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a < b
    }
}

/// Geometric mean profit per tick in trades: total profit ^ (1 / ticks).
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageProfitCriterion;

impl AverageProfitCriterion {
    fn per_tick(profit: Num, ticks: Num) -> Num {
        if ticks == Num::ZERO {
            Num::ONE
        } else {
            profit.pow(Num::ONE / ticks)
        }
    }
}

impl Criterion for AverageProfitCriterion {
    fn name(&self) -> &'static str {
        "Average profit"
    }

    fn calculate(
        &self,
        series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        let profit = TotalProfitCriterion.calculate(series, record)?;
        let ticks = NumberOfTicksCriterion.calculate(series, record)?;
        Ok(Self::per_tick(profit, ticks))
    }

    fn calculate_trade(&self, series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        let profit = TotalProfitCriterion.calculate_trade(series, trade)?;
        let ticks = NumberOfTicksCriterion.calculate_trade(series, trade)?;
        Ok(Self::per_tick(profit, ticks))
    }
}

/// Last close over first close: the profit of holding for the whole series.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyAndHoldCriterion;

impl Criterion for BuyAndHoldCriterion {
    fn name(&self) -> &'static str {
        "Buy and hold"
    }

    fn calculate(
        &self,
        series: &TimeSeries,
        _record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        match (series.first_tick(), series.last_tick()) {
            (Some(first), Some(last)) => Ok(last.close / first.close),
            _ => Err(StochtraderError::EmptySeries),
        }
    }

    /// Close at the trade's exit index over close at its entry index.
    fn calculate_trade(&self, series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        match (trade.entry(), trade.exit()) {
            (Some(entry), Some(exit)) => {
                Ok(series.tick(exit.index)?.close / series.tick(entry.index)?.close)
            }
            _ => Ok(Num::ONE),
        }
    }
}

/// Total profit relative to buy and hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersusBuyAndHoldCriterion;

impl Criterion for VersusBuyAndHoldCriterion {
    fn name(&self) -> &'static str {
        "Versus buy and hold"
    }

    fn calculate(
        &self,
        series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        Ok(TotalProfitCriterion.calculate(series, record)?
            / BuyAndHoldCriterion.calculate(series, record)?)
    }

    fn calculate_trade(&self, series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        Ok(TotalProfitCriterion.calculate_trade(series, trade)?
            / BuyAndHoldCriterion.calculate_trade(series, trade)?)
    }
}

/// Share of closed trades that ended with a profit. Zero with no trades.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinningTradesRatioCriterion;

impl Criterion for WinningTradesRatioCriterion {
    fn name(&self) -> &'static str {
        "Winning trades ratio"
    }

    fn calculate(
        &self,
        _series: &TimeSeries,
        record: &TradingRecord,
    ) -> Result<Num, StochtraderError> {
        let total = record.trade_count();
        if total == 0 {
            return Ok(Num::ZERO);
        }
        let winners = record
            .trades()
            .iter()
            .filter(|t| t.profit_ratio() > Num::ONE)
            .count();
        Ok(Num::from(winners) / Num::from(total))
    }

    fn calculate_trade(&self, _series: &TimeSeries, trade: &Trade) -> Result<Num, StochtraderError> {
        Ok(if trade.profit_ratio() > Num::ONE {
            Num::ONE
        } else {
            Num::ZERO
        })
    }
}

/// Every criterion above, computed once for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaSummary {
    pub total_profit: Num,
    pub trade_count: usize,
    pub open_trade: bool,
    pub number_of_ticks: Num,
    pub average_profit: Num,
    pub buy_and_hold: Num,
    pub versus_buy_and_hold: Num,
    pub winning_trades_ratio: Num,
}

impl CriteriaSummary {
    pub fn compute(series: &TimeSeries, record: &TradingRecord) -> Result<Self, StochtraderError> {
        Ok(CriteriaSummary {
            total_profit: TotalProfitCriterion.calculate(series, record)?,
            trade_count: record.trade_count(),
            open_trade: record.current_trade().is_opened(),
            number_of_ticks: NumberOfTicksCriterion.calculate(series, record)?,
            average_profit: AverageProfitCriterion.calculate(series, record)?,
            buy_and_hold: BuyAndHoldCriterion.calculate(series, record)?,
            versus_buy_and_hold: VersusBuyAndHoldCriterion.calculate(series, record)?,
            winning_trades_ratio: WinningTradesRatioCriterion.calculate(series, record)?,
        })
    }

    /// (label, value) pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (TotalProfitCriterion.name(), self.total_profit.to_string()),
            (
                TradeCountCriterion::default().name(),
                self.trade_count.to_string(),
            ),
            ("Open trade", self.open_trade.to_string()),
            (NumberOfTicksCriterion.name(), self.number_of_ticks.to_string()),
            (AverageProfitCriterion.name(), self.average_profit.to_string()),
            (BuyAndHoldCriterion.name(), self.buy_and_hold.to_string()),
            (
                VersusBuyAndHoldCriterion.name(),
                self.versus_buy_and_hold.to_string(),
            ),
            (
                WinningTradesRatioCriterion.name(),
                self.winning_trades_ratio.to_string(),
            ),
        ]
    }
}
