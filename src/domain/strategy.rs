//! Strategy configuration and composition.
//!
//! A strategy pairs an entry rule with an exit rule and refuses to signal
//! during its unstable period. It keeps no position state of its own: whether
//! a trade is open is read from the trading record passed in.

use std::rc::Rc;

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{StochasticBundle, StochasticParams};
use crate::domain::rule::Rule;
use crate::domain::series::TimeSeries;
use crate::domain::trading_record::{PositionState, TradingRecord};

#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub entry_rule: Rule,
    pub exit_rule: Rule,
    pub unstable_period: usize,
}

impl Strategy {
    pub fn new(name: impl Into<String>, entry_rule: Rule, exit_rule: Rule) -> Self {
        Strategy {
            name: name.into(),
            entry_rule,
            exit_rule,
            unstable_period: 0,
        }
    }

    pub fn with_unstable_period(mut self, unstable_period: usize) -> Self {
        self.unstable_period = unstable_period;
        self
    }

    pub fn is_unstable_at(&self, index: usize) -> bool {
        index < self.unstable_period
    }

    /// Entry rule holds, the strategy is stable, and no trade is open.
    pub fn should_enter(
        &self,
        index: usize,
        record: Option<&TradingRecord>,
    ) -> Result<bool, StochtraderError> {
        if self.is_unstable_at(index) || position_of(record) == PositionState::Long {
            return Ok(false);
        }
        self.entry_rule.is_satisfied(index, record)
    }

    /// Exit rule holds, the strategy is stable, and a trade is open.
    pub fn should_exit(
        &self,
        index: usize,
        record: Option<&TradingRecord>,
    ) -> Result<bool, StochtraderError> {
        if self.is_unstable_at(index) || position_of(record) == PositionState::Flat {
            return Ok(false);
        }
        self.exit_rule.is_satisfied(index, record)
    }

    /// Whether the record should change state at `index`.
    pub fn should_operate(
        &self,
        index: usize,
        record: &TradingRecord,
    ) -> Result<bool, StochtraderError> {
        match record.position() {
            PositionState::Flat => self.should_enter(index, Some(record)),
            PositionState::Long => self.should_exit(index, Some(record)),
        }
    }
}

fn position_of(record: Option<&TradingRecord>) -> PositionState {
    record.map_or(PositionState::Flat, TradingRecord::position)
}

/// Builds a [`Strategy`], rejecting a missing entry or exit rule.
#[derive(Debug, Default)]
pub struct StrategyBuilder {
    name: Option<String>,
    entry_rule: Option<Rule>,
    exit_rule: Option<Rule>,
    unstable_period: usize,
}

impl StrategyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn entry_rule(mut self, rule: Rule) -> Self {
        self.entry_rule = Some(rule);
        self
    }

    pub fn exit_rule(mut self, rule: Rule) -> Self {
        self.exit_rule = Some(rule);
        self
    }

    pub fn unstable_period(mut self, unstable_period: usize) -> Self {
        self.unstable_period = unstable_period;
        self
    }

    pub fn build(self) -> Result<Strategy, StochtraderError> {
        let entry_rule = self
            .entry_rule
            .ok_or(StochtraderError::MissingRule { which: "entry" })?;
        let exit_rule = self
            .exit_rule
            .ok_or(StochtraderError::MissingRule { which: "exit" })?;
        Ok(Strategy {
            name: self.name.unwrap_or_else(|| "Unnamed".to_string()),
            entry_rule,
            exit_rule,
            unstable_period: self.unstable_period,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StochasticStrategyParams {
    pub name: String,
    pub stochastic: StochasticParams,
    pub unstable_period: usize,
}

impl Default for StochasticStrategyParams {
    fn default() -> Self {
        StochasticStrategyParams {
            name: "Stochastic %D / %D2 crossover".to_string(),
            stochastic: StochasticParams::default(),
            unstable_period: 0,
        }
    }
}

/// Enter while %D is above %D2, exit while %D is below %D2.
pub fn build_stochastic_strategy(
    series: Rc<TimeSeries>,
    params: &StochasticStrategyParams,
) -> Result<Strategy, StochtraderError> {
    let bundle = StochasticBundle::new(series, params.stochastic)?;
    StrategyBuilder::new()
        .name(params.name.clone())
        .entry_rule(Rule::over(bundle.d.clone(), bundle.d2.clone()))
        .exit_rule(Rule::under(bundle.d, bundle.d2))
        .unstable_period(params.unstable_period)
        .build()
}
