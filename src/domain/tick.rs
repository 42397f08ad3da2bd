//! OHLCV tick representation.

use chrono::NaiveDateTime;

use super::num::Num;

/// One bar of the series, identified by the instant its period ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub end_time: NaiveDateTime,
    pub open: Num,
    pub high: Num,
    pub low: Num,
    pub close: Num,
    pub volume: Num,
}

impl Tick {
    pub fn new(
        end_time: NaiveDateTime,
        open: Num,
        high: Num,
        low: Num,
        close: Num,
        volume: Num,
    ) -> Self {
        Tick {
            end_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> Num {
        (self.high + self.low + self.close) / Num::from(3)
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: Num) -> Num {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}
