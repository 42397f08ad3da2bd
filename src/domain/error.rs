//! Domain error types.
//!
//! Structural misuse (bad index, missing rule, malformed input) is an error.
//! Numerically undefined results are not: they surface as [`Num::NaN`].
//!
//! [`Num::NaN`]: crate::domain::num::Num::NaN

/// Top-level error type for stochtrader.
#[derive(Debug, thiserror::Error)]
pub enum StochtraderError {
    #[error("index {index} out of range for series '{series}' of length {len}")]
    InvalidIndex {
        series: String,
        index: usize,
        len: usize,
    },

    #[error("cannot run a backtest on an empty series")]
    EmptySeries,

    #[error("tick {index} does not end after the previous tick")]
    UnorderedTicks { index: usize },

    #[error("strategy is missing its {which} rule")]
    MissingRule { which: &'static str },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StochtraderError {
    pub(crate) fn zero_period(name: &'static str) -> Self {
        StochtraderError::InvalidParameter {
            name,
            reason: "must be at least 1".into(),
        }
    }
}

impl From<&StochtraderError> for std::process::ExitCode {
    fn from(err: &StochtraderError) -> Self {
        let code: u8 = match err {
            StochtraderError::Io(_) => 1,
            StochtraderError::ConfigParse { .. }
            | StochtraderError::ConfigMissing { .. }
            | StochtraderError::ConfigInvalid { .. } => 2,
            StochtraderError::Load { .. } | StochtraderError::UnorderedTicks { .. } => 3,
            StochtraderError::MissingRule { .. } | StochtraderError::InvalidParameter { .. } => 4,
            StochtraderError::InvalidIndex { .. }
            | StochtraderError::EmptySeries
            | StochtraderError::InvalidOrder { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
