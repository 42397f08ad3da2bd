//! Immutable, chronologically ordered tick sequence.

use super::error::StochtraderError;
use super::tick::Tick;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    ticks: Vec<Tick>,
}

impl TimeSeries {
    /// Builds a series, rejecting ticks whose end time does not strictly
    /// increase.
    pub fn new(name: impl Into<String>, ticks: Vec<Tick>) -> Result<Self, StochtraderError> {
        if let Some(pos) = ticks
            .windows(2)
            .position(|w| w[1].end_time <= w[0].end_time)
        {
            return Err(StochtraderError::UnorderedTicks { index: pos + 1 });
        }
        Ok(TimeSeries {
            name: name.into(),
            ticks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn begin_index(&self) -> Option<usize> {
        if self.ticks.is_empty() { None } else { Some(0) }
    }

    pub fn end_index(&self) -> Option<usize> {
        self.ticks.len().checked_sub(1)
    }

    pub fn check_index(&self, index: usize) -> Result<(), StochtraderError> {
        if index < self.ticks.len() {
            Ok(())
        } else {
            Err(StochtraderError::InvalidIndex {
                series: self.name.clone(),
                index,
                len: self.ticks.len(),
            })
        }
    }

    pub fn tick(&self, index: usize) -> Result<&Tick, StochtraderError> {
        self.check_index(index)?;
        Ok(&self.ticks[index])
    }

    pub fn first_tick(&self) -> Option<&Tick> {
        self.ticks.first()
    }

    pub fn last_tick(&self) -> Option<&Tick> {
        self.ticks.last()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// "<first end time> - <last end time>", empty for an empty series.
    pub fn period_description(&self) -> String {
        match (self.first_tick(), self.last_tick()) {
            (Some(first), Some(last)) => format!(
                "{} - {}",
                first.end_time.format("%Y-%m-%d %H:%M"),
                last.end_time.format("%Y-%m-%d %H:%M")
            ),
            _ => String::new(),
        }
    }
}
