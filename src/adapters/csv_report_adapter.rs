//! Delimited-text report adapter implementing ReportPort.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::Writer;

use crate::domain::criteria::CriteriaSummary;
use crate::domain::error::StochtraderError;
use crate::domain::indicator::IndicatorRow;
use crate::domain::trade::{Order, Trade};
use crate::domain::trading_record::TradingRecord;
use crate::ports::report_port::ReportPort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const INDICATOR_HEADER: [&str; 5] = ["timestamp", "close", "k", "d", "d2"];
pub const TRADE_HEADER: [&str; 9] = [
    "trade",
    "entry_index",
    "entry_time",
    "entry_price",
    "exit_index",
    "exit_time",
    "exit_price",
    "amount",
    "profit_ratio",
];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<Writer<fs::File>, StochtraderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Writer::from_path(path).map_err(csv_error)
    }
}

fn csv_error(e: csv::Error) -> StochtraderError {
    StochtraderError::Io(std::io::Error::other(e))
}

fn format_time(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn order_fields(order: Option<&Order>) -> [String; 3] {
    match order {
        Some(o) => [o.index.to_string(), format_time(o.timestamp), o.price.to_string()],
        None => Default::default(),
    }
}

fn trade_row(number: usize, trade: &Trade) -> Vec<String> {
    let [entry_index, entry_time, entry_price] = order_fields(trade.entry());
    let [exit_index, exit_time, exit_price] = order_fields(trade.exit());
    let amount = trade
        .entry()
        .map(|o| o.amount.to_string())
        .unwrap_or_default();
    let ratio = if trade.is_closed() {
        trade.profit_ratio().to_string()
    } else {
        String::new()
    };
    vec![
        number.to_string(),
        entry_index,
        entry_time,
        entry_price,
        exit_index,
        exit_time,
        exit_price,
        amount,
        ratio,
    ]
}

impl ReportPort for CsvReportAdapter {
    fn write_indicators(&self, rows: &[IndicatorRow], path: &Path) -> Result<(), StochtraderError> {
        let mut wtr = Self::open(path)?;
        wtr.write_record(INDICATOR_HEADER).map_err(csv_error)?;
        for row in rows {
            wtr.write_record([
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                row.close.to_string(),
                row.k.to_string(),
                row.d.to_string(),
                row.d2.to_string(),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_trades(&self, record: &TradingRecord, path: &Path) -> Result<(), StochtraderError> {
        let mut wtr = Self::open(path)?;
        wtr.write_record(TRADE_HEADER).map_err(csv_error)?;
        for (i, trade) in record.trades().iter().enumerate() {
            wtr.write_record(trade_row(i + 1, trade)).map_err(csv_error)?;
        }
        if record.current_trade().is_opened() {
            wtr.write_record(trade_row(record.trade_count() + 1, record.current_trade()))
                .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_summary(
        &self,
        summary: &CriteriaSummary,
        path: &Path,
    ) -> Result<(), StochtraderError> {
        let mut wtr = Self::open(path)?;
        wtr.write_record(["criterion", "value"]).map_err(csv_error)?;
        for (name, value) in summary.entries() {
            wtr.write_record([name, value.as_str()]).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
