//! Per-instance memoization arena for indicator values.

use std::cell::RefCell;

use crate::domain::error::StochtraderError;
use crate::domain::num::Num;

/// Lazily filled slots, one per series index. A stored value is never
/// recomputed or invalidated.
#[derive(Debug)]
pub struct IndicatorCache {
    values: RefCell<Vec<Option<Num>>>,
}

impl IndicatorCache {
    pub fn new(len: usize) -> Self {
        IndicatorCache {
            values: RefCell::new(vec![None; len]),
        }
    }

    pub fn get(&self, index: usize) -> Option<Num> {
        self.values.borrow().get(index).copied().flatten()
    }

    /// Returns the cached value at `index`, computing and storing it first if
    /// needed. The borrow is released while `compute` runs so it may read
    /// other indices of the same cache.
    pub fn get_or_compute(
        &self,
        index: usize,
        compute: impl FnOnce() -> Result<Num, StochtraderError>,
    ) -> Result<Num, StochtraderError> {
        if let Some(value) = self.get(index) {
            return Ok(value);
        }
        let value = compute()?;
        if let Some(slot) = self.values.borrow_mut().get_mut(index) {
            *slot = Some(value);
        }
        Ok(value)
    }

    /// For indicators defined on their own previous value: fills every slot
    /// from the first empty one up to `index` in ascending order, so that
    /// `compute(i)` can always find `i - 1` in the cache.
    pub fn get_or_fill_prefix(
        &self,
        index: usize,
        mut compute: impl FnMut(usize) -> Result<Num, StochtraderError>,
    ) -> Result<Num, StochtraderError> {
        if let Some(value) = self.get(index) {
            return Ok(value);
        }
        let start = self.highest_cached().map_or(0, |h| h + 1).min(index);
        let mut value = Num::NaN;
        for i in start..=index {
            value = self.get_or_compute(i, || compute(i))?;
        }
        Ok(value)
    }

    pub fn highest_cached(&self) -> Option<usize> {
        self.values.borrow().iter().rposition(Option::is_some)
    }

    pub fn cached_count(&self) -> usize {
        self.values.borrow().iter().filter(|v| v.is_some()).count()
    }
}
