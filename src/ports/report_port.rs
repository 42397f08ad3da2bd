//! Report generation port trait.

use std::path::Path;

use crate::domain::criteria::CriteriaSummary;
use crate::domain::error::StochtraderError;
use crate::domain::indicator::IndicatorRow;
use crate::domain::trading_record::TradingRecord;

/// Port for writing run output.
pub trait ReportPort {
    /// One row per series index: timestamp, close and the stochastic values.
    fn write_indicators(&self, rows: &[IndicatorRow], path: &Path) -> Result<(), StochtraderError>;

    /// Closed trades in order, then the open trade if there is one.
    fn write_trades(&self, record: &TradingRecord, path: &Path) -> Result<(), StochtraderError>;

    fn write_summary(
        &self,
        summary: &CriteriaSummary,
        path: &Path,
    ) -> Result<(), StochtraderError>;
}
