//! Technical indicator framework.
//!
//! An indicator is a pull-based function `index -> Num` over one fixed
//! [`TimeSeries`], either reading ticks directly or wrapping another indicator.
//! Indicators that do real work keep a private [`IndicatorCache`], so each index
//! is computed at most once per instance. Wrapped indicators are shared through
//! [`SharedIndicator`] so that several rules reading the same %D, for example,
//! also share its cache.
//!
//! - `IndicatorKind`: indicator identity + parameters, used for labels
//! - `windowed_*`: clamped-window helpers shared by the moving averages and
//!   the stochastic family

pub mod cache;
pub mod ema;
pub mod extremes;
pub mod price;
pub mod roc;
pub mod sma;
pub mod stochastic;

use std::fmt;
use std::rc::Rc;

use crate::domain::error::StochtraderError;
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;

pub use cache::IndicatorCache;
pub use ema::Ema;
pub use extremes::{HighestValue, LowestValue};
pub use price::{PriceField, PriceIndicator};
pub use roc::Roc;
pub use sma::Sma;
pub use stochastic::{
    IndicatorRow, StochasticBundle, StochasticOscillatorD, StochasticOscillatorD2,
    StochasticOscillatorK, StochasticParams,
};

pub trait Indicator: fmt::Debug {
    /// Value at `index`. Fails with `InvalidIndex` outside `[0, len)`.
    fn value(&self, index: usize) -> Result<Num, StochtraderError>;

    fn series(&self) -> &TimeSeries;

    fn kind(&self) -> IndicatorKind;
}

pub type SharedIndicator = Rc<dyn Indicator>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Price(PriceField),
    Sma(usize),
    Ema(usize),
    Roc(usize),
    Highest(usize),
    Lowest(usize),
    StochasticK(usize),
    StochasticD(usize),
    StochasticD2(usize),
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Price(field) => write!(f, "{}", field),
            IndicatorKind::Sma(period) => write!(f, "SMA({})", period),
            IndicatorKind::Ema(period) => write!(f, "EMA({})", period),
            IndicatorKind::Roc(period) => write!(f, "ROC({})", period),
            IndicatorKind::Highest(period) => write!(f, "HIGHEST({})", period),
            IndicatorKind::Lowest(period) => write!(f, "LOWEST({})", period),
            IndicatorKind::StochasticK(lookback) => write!(f, "STOCH_K({})", lookback),
            IndicatorKind::StochasticD(smoothing) => write!(f, "STOCH_D({})", smoothing),
            IndicatorKind::StochasticD2(smoothing) => write!(f, "STOCH_D2({})", smoothing),
        }
    }
}

/// First index of the window of `length` values ending at `index`, clamped at 0.
pub fn window_start(index: usize, length: usize) -> usize {
    (index + 1).saturating_sub(length)
}

/// Mean of `indicator` over the clamped window ending at `index`.
///
/// Divides by the number of values actually in the window, so near the start
/// of the series fewer than `length` points are averaged.
pub fn windowed_average(
    indicator: &dyn Indicator,
    index: usize,
    length: usize,
) -> Result<Num, StochtraderError> {
    let start = window_start(index, length);
    let mut sum = indicator.value(index)?;
    for i in start..index {
        sum = sum + indicator.value(i)?;
    }
    Ok(sum / Num::from(index - start + 1))
}

pub fn windowed_max(
    indicator: &dyn Indicator,
    index: usize,
    length: usize,
) -> Result<Num, StochtraderError> {
    let mut highest = indicator.value(index)?;
    for i in window_start(index, length)..index {
        highest = highest.max(indicator.value(i)?);
    }
    Ok(highest)
}

pub fn windowed_min(
    indicator: &dyn Indicator,
    index: usize,
    length: usize,
) -> Result<Num, StochtraderError> {
    let mut lowest = indicator.value(index)?;
    for i in window_start(index, length)..index {
        lowest = lowest.min(indicator.value(i)?);
    }
    Ok(lowest)
}

pub(crate) fn require_period(name: &'static str, period: usize) -> Result<usize, StochtraderError> {
    if period == 0 {
        Err(StochtraderError::zero_period(name))
    } else {
        Ok(period)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::tick::Tick;
    use chrono::{Duration, NaiveDate};
    use std::cell::Cell;

    pub fn series_from_closes(closes: &[i64]) -> Rc<TimeSeries> {
        let hlc: Vec<(i64, i64, i64)> = closes.iter().map(|&c| (c, c, c)).collect();
        series_from_hlc(&hlc)
    }

    pub fn series_from_hlc(hlc: &[(i64, i64, i64)]) -> Rc<TimeSeries> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ticks = hlc
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                Tick::new(
                    start + Duration::days(i as i64),
                    Num::from(close),
                    Num::from(high),
                    Num::from(low),
                    Num::from(close),
                    Num::from(1000),
                )
            })
            .collect();
        Rc::new(TimeSeries::new("TEST", ticks).unwrap())
    }

    /// Close-price indicator that counts how often it is evaluated.
    #[derive(Debug)]
    pub struct CountingIndicator {
        inner: PriceIndicator,
        pub calls: Cell<usize>,
    }

    impl CountingIndicator {
        pub fn new(series: Rc<TimeSeries>) -> Self {
            CountingIndicator {
                inner: PriceIndicator::close(series),
                calls: Cell::new(0),
            }
        }
    }

    impl Indicator for CountingIndicator {
        fn value(&self, index: usize) -> Result<Num, StochtraderError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.value(index)
        }

        fn series(&self) -> &TimeSeries {
            self.inner.series()
        }

        fn kind(&self) -> IndicatorKind {
            self.inner.kind()
        }
    }
}
