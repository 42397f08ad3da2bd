#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use stochtrader::domain::criteria::CriteriaSummary;
use stochtrader::domain::error::StochtraderError;
use stochtrader::domain::indicator::{IndicatorRow, PriceIndicator};
use stochtrader::domain::num::Num;
use stochtrader::domain::rule::Rule;
use stochtrader::domain::series::TimeSeries;
use stochtrader::domain::strategy::Strategy;
pub use stochtrader::domain::tick::Tick;
use stochtrader::domain::trading_record::TradingRecord;
use stochtrader::ports::data_port::SeriesLoader;
use stochtrader::ports::report_port::ReportPort;

pub struct MockSeriesLoader {
    pub ticks: Vec<Tick>,
    pub error: Option<String>,
}

impl MockSeriesLoader {
    pub fn new(ticks: Vec<Tick>) -> Self {
        Self { ticks, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            ticks: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl SeriesLoader for MockSeriesLoader {
    fn load_series(&self, name: &str) -> Result<TimeSeries, StochtraderError> {
        if let Some(reason) = &self.error {
            return Err(StochtraderError::Load {
                source_name: name.to_string(),
                reason: reason.clone(),
            });
        }
        TimeSeries::new(name, self.ticks.clone())
    }
}

/// Remembers what each report call received instead of writing files.
#[derive(Default)]
pub struct MockReportPort {
    pub indicators: RefCell<Vec<(Vec<IndicatorRow>, PathBuf)>>,
    pub trades: RefCell<Vec<(TradingRecord, PathBuf)>>,
    pub summaries: RefCell<Vec<(CriteriaSummary, PathBuf)>>,
}

impl ReportPort for MockReportPort {
    fn write_indicators(&self, rows: &[IndicatorRow], path: &Path) -> Result<(), StochtraderError> {
        self.indicators
            .borrow_mut()
            .push((rows.to_vec(), path.to_path_buf()));
        Ok(())
    }

    fn write_trades(&self, record: &TradingRecord, path: &Path) -> Result<(), StochtraderError> {
        self.trades
            .borrow_mut()
            .push((record.clone(), path.to_path_buf()));
        Ok(())
    }

    fn write_summary(
        &self,
        summary: &CriteriaSummary,
        path: &Path,
    ) -> Result<(), StochtraderError> {
        self.summaries
            .borrow_mut()
            .push((summary.clone(), path.to_path_buf()));
        Ok(())
    }
}

pub fn day(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(offset)
}

/// A daily tick with high = close + 1 and low = close - 1.
pub fn make_tick(offset: i64, close: i64) -> Tick {
    Tick::new(
        day(offset),
        Num::from(close),
        Num::from(close + 1),
        Num::from(close - 1),
        Num::from(close),
        Num::from(1000),
    )
}

pub fn make_ticks(closes: &[i64]) -> Vec<Tick> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_tick(i as i64, c))
        .collect()
}

pub fn make_series(closes: &[i64]) -> Rc<TimeSeries> {
    Rc::new(TimeSeries::new("TEST", make_ticks(closes)).unwrap())
}

/// Long above `level`, flat below it.
pub fn threshold_strategy(series: &Rc<TimeSeries>, level: i64) -> Strategy {
    let close = Rc::new(PriceIndicator::close(series.clone()));
    Strategy::new(
        "Threshold",
        Rule::over(close.clone(), Num::from(level)),
        Rule::under(close, Num::from(level)),
    )
}

/// A zig-zag with enough swings for the %D / %D2 crossover to trade.
pub fn oscillating_closes(len: usize) -> Vec<i64> {
    (0..len)
        .map(|i| {
            let phase = (i % 20) as i64;
            let swing = if phase < 10 { phase } else { 20 - phase };
            100 + swing * 3
        })
        .collect()
}
