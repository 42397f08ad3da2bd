//! Configuration validation.
//!
//! Validates all config fields before a run. Typed [`ConfigPort`] getters
//! fall back to defaults on unparseable input, so the raw strings are checked
//! here.

use std::str::FromStr;

use crate::domain::error::StochtraderError;
use crate::domain::num::Num;
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), StochtraderError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(missing("data", "path")),
    }
}

pub fn validate_stochastic_config(config: &dyn ConfigPort) -> Result<(), StochtraderError> {
    for key in ["lookback", "d_smoothing", "d2_smoothing"] {
        if let Some(value) = parse_optional::<usize>(config, "stochastic", key)? {
            if value == 0 {
                return Err(invalid("stochastic", key, format!("{} must be at least 1", key)));
            }
        }
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), StochtraderError> {
    parse_optional::<usize>(config, "strategy", "unstable_period")?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StochtraderError> {
    if let Some(amount) = parse_optional::<Num>(config, "backtest", "amount")? {
        if amount.is_nan() || amount <= Num::ZERO {
            return Err(invalid("backtest", "amount", "amount must be positive".to_string()));
        }
    }
    if let Some(raw) = config.get_string("backtest", "force_close") {
        if parse_bool(&raw).is_none() {
            return Err(invalid(
                "backtest",
                "force_close",
                format!("expected true/false, got '{}'", raw.trim()),
            ));
        }
    }
    Ok(())
}

/// Runs every section check, stopping at the first failure.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), StochtraderError> {
    validate_data_config(config)?;
    validate_stochastic_config(config)?;
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_optional<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, StochtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            invalid(section, key, format!("'{}' is not a valid {}", raw.trim(), key))
        }),
    }
}

fn missing(section: &str, key: &str) -> StochtraderError {
    StochtraderError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> StochtraderError {
    StochtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}
