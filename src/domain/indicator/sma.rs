//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean of the wrapped indicator over [i-n+1, i], window clamped
//! at the start of the series.

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{
    require_period, windowed_average, Indicator, IndicatorCache, IndicatorKind, SharedIndicator,
};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

#[derive(Debug)]
pub struct Sma {
    indicator: SharedIndicator,
    period: usize,
    cache: IndicatorCache,
}

impl Sma {
    pub fn new(indicator: SharedIndicator, period: usize) -> Result<Self, StochtraderError> {
        let period = require_period("period", period)?;
        let cache = IndicatorCache::new(indicator.series().len());
        Ok(Sma {
            indicator,
            period,
            cache,
        })
    }
}

impl Indicator for Sma {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            windowed_average(self.indicator.as_ref(), index, self.period)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.indicator.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma(self.period)
    }
}
