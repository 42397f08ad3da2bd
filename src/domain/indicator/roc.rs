//! ROC (Rate of Change) indicator.
//!
//! ROC(n)[i] = ((V[i] - V[j]) / V[j]) * 100, j = max(i - n, 0)
//! If V[j] == 0: ROC = NaN

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{
    require_period, Indicator, IndicatorCache, IndicatorKind, SharedIndicator,
};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

#[derive(Debug)]
pub struct Roc {
    indicator: SharedIndicator,
    period: usize,
    cache: IndicatorCache,
}

impl Roc {
    pub fn new(indicator: SharedIndicator, period: usize) -> Result<Self, StochtraderError> {
        let period = require_period("period", period)?;
        let cache = IndicatorCache::new(indicator.series().len());
        Ok(Roc {
            indicator,
            period,
            cache,
        })
    }
}

impl Indicator for Roc {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            let prev = self.indicator.value(index.saturating_sub(self.period))?;
            let curr = self.indicator.value(index)?;
            Ok((curr - prev) / prev * Num::HUNDRED)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.indicator.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Roc(self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_closes;
    use crate::domain::indicator::PriceIndicator;
    use std::rc::Rc;

    fn roc(closes: &[i64], period: usize) -> Roc {
        let series = series_from_closes(closes);
        Roc::new(Rc::new(PriceIndicator::close(series)), period).unwrap()
    }

    #[test]
    fn roc_clamped_start_is_zero() {
        let roc = roc(&[100, 105, 110], 2);
        assert_eq!(roc.value(0).unwrap(), Num::ZERO);
    }

    #[test]
    fn roc_basic_calculation() {
        let roc = roc(&[100, 105, 110, 115], 2);
        assert_eq!(roc.value(2).unwrap(), Num::from(10));
        let expected = (Num::from(115) - Num::from(105)) / Num::from(105) * Num::HUNDRED;
        assert_eq!(roc.value(3).unwrap(), expected);
    }

    #[test]
    fn roc_zero_division() {
        let roc = roc(&[0, 100, 110], 2);
        assert!(roc.value(2).unwrap().is_nan());
    }

    #[test]
    fn roc_negative_change() {
        let roc = roc(&[100, 90, 80], 2);
        let v = roc.value(2).unwrap();
        assert_eq!(v, Num::from(-20));
        assert!(v < Num::ZERO);
    }

    #[test]
    fn roc_indicator_kind() {
        let roc = roc(&[100, 105], 10);
        assert_eq!(roc.kind(), IndicatorKind::Roc(10));
    }
}
