//! Tick field accessors (close, high, low, ...).
//!
//! Reading a tick is already O(1), so these indicators carry no cache.

use std::fmt;
use std::rc::Rc;

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{Indicator, IndicatorKind};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
    Typical,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceField::Open => "OPEN",
            PriceField::High => "HIGH",
            PriceField::Low => "LOW",
            PriceField::Close => "CLOSE",
            PriceField::Volume => "VOLUME",
            PriceField::Typical => "TYPICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct PriceIndicator {
    series: Rc<TimeSeries>,
    field: PriceField,
}

impl PriceIndicator {
    pub fn new(series: Rc<TimeSeries>, field: PriceField) -> Self {
        PriceIndicator { series, field }
    }

    pub fn close(series: Rc<TimeSeries>) -> Self {
        Self::new(series, PriceField::Close)
    }

    pub fn high(series: Rc<TimeSeries>) -> Self {
        Self::new(series, PriceField::High)
    }

    pub fn low(series: Rc<TimeSeries>) -> Self {
        Self::new(series, PriceField::Low)
    }

    pub fn field(&self) -> PriceField {
        self.field
    }
}

impl Indicator for PriceIndicator {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        let tick = self.series.tick(index)?;
        Ok(match self.field {
            PriceField::Open => tick.open,
            PriceField::High => tick.high,
            PriceField::Low => tick.low,
            PriceField::Close => tick.close,
            PriceField::Volume => tick.volume,
            PriceField::Typical => tick.typical_price(),
        })
    }

    fn series(&self) -> &TimeSeries {
        &self.series
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Price(self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_hlc;

    #[test]
    fn reads_each_field() {
        let series = series_from_hlc(&[(12, 8, 10), (15, 9, 14)]);
        let at = |field| PriceIndicator::new(series.clone(), field).value(1).unwrap();
        assert_eq!(at(PriceField::High), Num::from(15));
        assert_eq!(at(PriceField::Low), Num::from(9));
        assert_eq!(at(PriceField::Close), Num::from(14));
        assert_eq!(at(PriceField::Open), Num::from(14));
        assert_eq!(at(PriceField::Volume), Num::from(1000));
        assert_eq!(at(PriceField::Typical), Num::from(38) / Num::from(3));
    }

    #[test]
    fn close_price_out_of_range() {
        let series = series_from_hlc(&[(12, 8, 10)]);
        let close = PriceIndicator::close(series);
        assert_eq!(close.value(0).unwrap(), Num::from(10));
        assert!(matches!(
            close.value(1),
            Err(StochtraderError::InvalidIndex { index: 1, len: 1, .. })
        ));
    }

    #[test]
    fn kind_names_field() {
        let series = series_from_hlc(&[(12, 8, 10)]);
        assert_eq!(PriceIndicator::low(series).kind().to_string(), "LOW");
    }
}
