//! Core engine: values, series, indicators, rules, strategies and backtests.

pub mod error;
pub mod num;
pub mod tick;
pub mod series;
pub mod indicator;
pub mod rule;
pub mod rule_eval;
pub mod trade;
pub mod trading_record;
pub mod strategy;
pub mod backtest;
pub mod criteria;
pub mod config_validation;
