//! Data access port trait.

use crate::domain::error::StochtraderError;
use crate::domain::series::TimeSeries;

/// Produces a validated, chronologically ascending series. Malformed input
/// is rejected here, never surfaced later from inside an indicator.
pub trait SeriesLoader {
    fn load_series(&self, name: &str) -> Result<TimeSeries, StochtraderError>;
}
