//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), EMA[0] = V[0], then EMA[i] = EMA[i-1] + k*(V[i] - EMA[i-1]).
//! Values are filled through the cache in ascending order, so asking for a
//! late index does not recurse through every earlier one.

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{
    require_period, Indicator, IndicatorCache, IndicatorKind, SharedIndicator,
};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

#[derive(Debug)]
pub struct Ema {
    indicator: SharedIndicator,
    period: usize,
    multiplier: Num,
    cache: IndicatorCache,
}

impl Ema {
    pub fn new(indicator: SharedIndicator, period: usize) -> Result<Self, StochtraderError> {
        let period = require_period("period", period)?;
        let cache = IndicatorCache::new(indicator.series().len());
        Ok(Ema {
            indicator,
            period,
            multiplier: Num::from(2) / Num::from(period + 1),
            cache,
        })
    }

    fn calculate(&self, index: usize) -> Result<Num, StochtraderError> {
        let current = self.indicator.value(index)?;
        if index == 0 {
            return Ok(current);
        }
        let prev = self.cache.get(index - 1).unwrap_or(Num::NaN);
        Ok(prev + self.multiplier * (current - prev))
    }
}

impl Indicator for Ema {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache
            .get_or_fill_prefix(index, |i| self.calculate(i))
    }

    fn series(&self) -> &TimeSeries {
        self.indicator.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema(self.period)
    }
}
