//! CSV file series loader.
//!
//! Expects a header row naming `date`, `open`, `high`, `low`, `close` and
//! `volume` columns in any order. Rows may be newest-first; the loaded series
//! is always ascending.

use crate::domain::error::StochtraderError;
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;
use crate::domain::tick::Tick;
use crate::ports::data_port::SeriesLoader;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::path::PathBuf;
use tracing::{debug, info};

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%b %d %Y", "%b %d, %Y"];

pub struct CsvSeriesLoader {
    path: PathBuf,
}

impl CsvSeriesLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn error(&self, reason: String) -> StochtraderError {
        StochtraderError::Load {
            source_name: self.path.display().to_string(),
            reason,
        }
    }

    fn column_indices(&self, headers: &StringRecord) -> Result<[usize; 6], StochtraderError> {
        let mut indices = [0usize; 6];
        for (slot, name) in indices.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| self.error(format!("missing {} column", name)))?;
        }
        Ok(indices)
    }

    fn parse_row(
        &self,
        row: usize,
        record: &StringRecord,
        cols: &[usize; 6],
    ) -> Result<Tick, StochtraderError> {
        let field = |i: usize| {
            record
                .get(cols[i])
                .map(str::trim)
                .ok_or_else(|| self.error(format!("row {}: missing {} column", row, COLUMNS[i])))
        };
        let price = |i: usize| -> Result<Num, StochtraderError> {
            let raw = field(i)?;
            parse_price(raw).ok_or_else(|| {
                self.error(format!("row {}: invalid {} value '{}'", row, COLUMNS[i], raw))
            })
        };

        let date_raw = field(0)?;
        let end_time = parse_timestamp(date_raw)
            .ok_or_else(|| self.error(format!("row {}: invalid date '{}'", row, date_raw)))?;
        let volume_raw = field(5)?;
        let volume = parse_volume(volume_raw).ok_or_else(|| {
            self.error(format!("row {}: invalid volume value '{}'", row, volume_raw))
        })?;

        Ok(Tick::new(end_time, price(1)?, price(2)?, price(3)?, price(4)?, volume))
    }
}

impl SeriesLoader for CsvSeriesLoader {
    fn load_series(&self, name: &str) -> Result<TimeSeries, StochtraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.error(e.to_string()))?;

        let headers = rdr.headers().map_err(|e| self.error(e.to_string()))?.clone();
        let cols = self.column_indices(&headers)?;

        let mut ticks = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.error(format!("CSV parse error: {}", e)))?;
            // header is line 1
            ticks.push(self.parse_row(i + 2, &record, &cols)?);
        }

        ticks.sort_by_key(|t| t.end_time);
        debug!(path = %self.path.display(), rows = ticks.len(), "parsed ticks");

        let series = TimeSeries::new(name, ticks)?;
        info!(
            series = name,
            ticks = series.len(),
            period = %series.period_description(),
            "loaded series"
        );
        Ok(series)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(raw: &str) -> Option<Num> {
    let value: Num = raw.replace(',', "").parse().ok()?;
    (!value.is_nan()).then_some(value)
}

/// Plain numbers or a `K` / `M` multiplier suffix ("1.5M", "320K").
pub fn parse_volume(raw: &str) -> Option<Num> {
    let cleaned = raw.replace(',', "");
    let (digits, multiplier) = match cleaned.chars().last()? {
        'K' | 'k' => (&cleaned[..cleaned.len() - 1], Num::from(1_000)),
        'M' | 'm' => (&cleaned[..cleaned.len() - 1], Num::from(1_000_000)),
        _ => (cleaned.as_str(), Num::ONE),
    };
    parse_price(digits).map(|v| v * multiplier)
}
