//! Stochastic oscillator family: %K, %D (slow) and %D2 (%D smoothed again).
//!
//! %K(n)[i] = 100 * (C[i] - L) / (H - L), with H / L the highest high and
//! lowest low over [i-n+1, i] clamped at 0. H == L gives NaN.
//! %D(m)[i]  = mean of %K over the clamped window of m values ending at i.
//! %D2(m)[i] = mean of %D over the clamped window of m values ending at i.

use chrono::NaiveDateTime;
use std::rc::Rc;

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{
    require_period, windowed_average, windowed_max, windowed_min, Indicator, IndicatorCache,
    IndicatorKind, PriceIndicator, SharedIndicator,
};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

pub const DEFAULT_LOOKBACK: usize = 14;
pub const DEFAULT_SMOOTHING: usize = 3;

#[derive(Debug)]
pub struct StochasticOscillatorK {
    series: Rc<TimeSeries>,
    high: PriceIndicator,
    low: PriceIndicator,
    lookback: usize,
    cache: IndicatorCache,
}

impl StochasticOscillatorK {
    pub fn new(series: Rc<TimeSeries>, lookback: usize) -> Result<Self, StochtraderError> {
        let lookback = require_period("lookback", lookback)?;
        Ok(StochasticOscillatorK {
            high: PriceIndicator::high(series.clone()),
            low: PriceIndicator::low(series.clone()),
            cache: IndicatorCache::new(series.len()),
            series,
            lookback,
        })
    }

    fn calculate(&self, index: usize) -> Result<Num, StochtraderError> {
        let highest = windowed_max(&self.high, index, self.lookback)?;
        let lowest = windowed_min(&self.low, index, self.lookback)?;
        let close = self.series.tick(index)?.close;
        Ok(Num::HUNDRED * (close - lowest) / (highest - lowest))
    }
}

impl Indicator for StochasticOscillatorK {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series.check_index(index)?;
        self.cache.get_or_compute(index, || self.calculate(index))
    }

    fn series(&self) -> &TimeSeries {
        &self.series
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::StochasticK(self.lookback)
    }
}

/// Slow %D: a windowed average of the wrapped %K (or any indicator).
#[derive(Debug)]
pub struct StochasticOscillatorD {
    k: SharedIndicator,
    smoothing: usize,
    cache: IndicatorCache,
}

impl StochasticOscillatorD {
    pub fn new(k: SharedIndicator) -> Self {
        let cache = IndicatorCache::new(k.series().len());
        StochasticOscillatorD {
            k,
            smoothing: DEFAULT_SMOOTHING,
            cache,
        }
    }

    pub fn with_smoothing(k: SharedIndicator, smoothing: usize) -> Result<Self, StochtraderError> {
        let smoothing = require_period("d_smoothing", smoothing)?;
        Ok(StochasticOscillatorD {
            smoothing,
            ..Self::new(k)
        })
    }
}

impl Indicator for StochasticOscillatorD {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            windowed_average(self.k.as_ref(), index, self.smoothing)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.k.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::StochasticD(self.smoothing)
    }
}

/// Second smoothing pass: a windowed average of the wrapped %D.
#[derive(Debug)]
pub struct StochasticOscillatorD2 {
    d: SharedIndicator,
    smoothing: usize,
    cache: IndicatorCache,
}

impl StochasticOscillatorD2 {
    pub fn new(d: SharedIndicator) -> Self {
        let cache = IndicatorCache::new(d.series().len());
        StochasticOscillatorD2 {
            d,
            smoothing: DEFAULT_SMOOTHING,
            cache,
        }
    }

    pub fn with_smoothing(d: SharedIndicator, smoothing: usize) -> Result<Self, StochtraderError> {
        let smoothing = require_period("d2_smoothing", smoothing)?;
        Ok(StochasticOscillatorD2 {
            smoothing,
            ..Self::new(d)
        })
    }
}

impl Indicator for StochasticOscillatorD2 {
    fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        self.series().check_index(index)?;
        self.cache.get_or_compute(index, || {
            windowed_average(self.d.as_ref(), index, self.smoothing)
        })
    }

    fn series(&self) -> &TimeSeries {
        self.d.series()
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::StochasticD2(self.smoothing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StochasticParams {
    pub lookback: usize,
    pub d_smoothing: usize,
    pub d2_smoothing: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        StochasticParams {
            lookback: DEFAULT_LOOKBACK,
            d_smoothing: DEFAULT_SMOOTHING,
            d2_smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// One output line for the indicator report.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub close: Num,
    pub k: Num,
    pub d: Num,
    pub d2: Num,
}

/// %K, %D and %D2 wired together over one series, sharing caches.
#[derive(Debug, Clone)]
pub struct StochasticBundle {
    pub close: Rc<PriceIndicator>,
    pub k: Rc<StochasticOscillatorK>,
    pub d: Rc<StochasticOscillatorD>,
    pub d2: Rc<StochasticOscillatorD2>,
}

impl StochasticBundle {
    pub fn new(series: Rc<TimeSeries>, params: StochasticParams) -> Result<Self, StochtraderError> {
        let close = Rc::new(PriceIndicator::close(series.clone()));
        let k = Rc::new(StochasticOscillatorK::new(series, params.lookback)?);
        let d = Rc::new(StochasticOscillatorD::with_smoothing(
            k.clone(),
            params.d_smoothing,
        )?);
        let d2 = Rc::new(StochasticOscillatorD2::with_smoothing(
            d.clone(),
            params.d2_smoothing,
        )?);
        Ok(StochasticBundle { close, k, d, d2 })
    }

    /// Per-index values in series order.
    pub fn rows(&self) -> Result<Vec<IndicatorRow>, StochtraderError> {
        let series = self.k.series();
        let mut rows = Vec::with_capacity(series.len());
        for (index, tick) in series.ticks().iter().enumerate() {
            rows.push(IndicatorRow {
                timestamp: tick.end_time,
                close: self.close.value(index)?,
                k: self.k.value(index)?,
                d: self.d.value(index)?,
                d2: self.d2.value(index)?,
            });
        }
        Ok(rows)
    }
}
