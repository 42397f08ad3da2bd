//! Highest / lowest value of an indicator over a clamped look-back window.

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{
    require_period, windowed_max, windowed_min, Indicator, IndicatorCache, IndicatorKind,
    SharedIndicator,
};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

#[derive(Debug)]
pub struct HighestValue {
    indicator: SharedIndicator,
    period: usize,
    cache: IndicatorCache,
}

impl HighestValue {
    pub fn new(indicator: SharedIndicator, period: usize) -> Result<Self, StochtraderError> {
        let period = require_period("period", period)?;
        let cache = IndicatorCache::new(indicator.series().len());
        Ok(HighestValue {
            indicator,
            period,
            cache,
        })
    }
}

impl Indicator for HighestValue {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            windowed_max(self.indicator.as_ref(), index, self.period)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.indicator.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Highest(self.period)
    }
}

#[derive(Debug)]
pub struct LowestValue {
    indicator: SharedIndicator,
    period: usize,
    cache: IndicatorCache,
}

impl LowestValue {
    pub fn new(indicator: SharedIndicator, period: usize) -> Result<Self, StochtraderError> {
        let period = require_period("period", period)?;
        let cache = IndicatorCache::new(indicator.series().len());
        Ok(LowestValue {
            indicator,
            period,
            cache,
        })
    }
}

impl Indicator for LowestValue {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            windowed_min(self.indicator.as_ref(), index, self.period)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.indicator.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Lowest(self.period)
    }
}
