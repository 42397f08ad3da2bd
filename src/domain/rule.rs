//! Rule AST.
//!
//! This module defines the tree that trading rules are built from:
//! - `Operand`: what can be compared (a constant or a shared indicator)
//! - `Rule`: comparison, stop, constant and logical variants
//!
//! Rules are immutable and hold no state; evaluation lives in
//! [`rule_eval`](crate::domain::rule_eval).

use std::rc::Rc;

use crate::domain::error::StochtraderError;
use crate::domain::indicator::{Indicator, IndicatorKind, SharedIndicator};
use crate::domain::num::Num;
use crate::domain::rule_eval;
use crate::domain::trading_record::TradingRecord;

#[derive(Debug, Clone)]
pub enum Operand {
    Constant(Num),
    Indicator(SharedIndicator),
}

impl Operand {
    pub fn value(&self, index: usize) -> Result<Num, StochtraderError> {
        match self {
            Operand::Constant(v) => Ok(*v),
            Operand::Indicator(indicator) => indicator.value(index),
        }
    }
}

impl From<Num> for Operand {
    fn from(value: Num) -> Self {
        Operand::Constant(value)
    }
}

impl<I: Indicator + 'static> From<Rc<I>> for Operand {
    fn from(indicator: Rc<I>) -> Self {
        Operand::Indicator(indicator)
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Over {
        left: Operand,
        right: Operand,
    },
    Under {
        left: Operand,
        right: Operand,
    },
    CrossedUp {
        left: Operand,
        right: Operand,
    },
    CrossedDown {
        left: Operand,
        right: Operand,
    },
    Between {
        operand: Operand,
        lower: Num,
        upper: Num,
    },
    StopGain {
        price: SharedIndicator,
        gain_pct: Num,
    },
    StopLoss {
        price: SharedIndicator,
        loss_pct: Num,
    },
    Boolean(bool),
    And(Vec<Rule>),
    Or(Vec<Rule>),
    Xor(Box<Rule>, Box<Rule>),
    Not(Box<Rule>),
}

impl Rule {
    pub fn over(left: impl Into<Operand>, right: impl Into<Operand>) -> Rule {
        Rule::Over {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn under(left: impl Into<Operand>, right: impl Into<Operand>) -> Rule {
        Rule::Under {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn crossed_up(left: impl Into<Operand>, right: impl Into<Operand>) -> Rule {
        Rule::CrossedUp {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn crossed_down(left: impl Into<Operand>, right: impl Into<Operand>) -> Rule {
        Rule::CrossedDown {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn stop_gain(price: SharedIndicator, gain_pct: Num) -> Rule {
        Rule::StopGain { price, gain_pct }
    }

    pub fn stop_loss(price: SharedIndicator, loss_pct: Num) -> Rule {
        Rule::StopLoss { price, loss_pct }
    }

    /// True where both rules are true. Nested `And`s are flattened.
    pub fn and(self, other: Rule) -> Rule {
        match self {
            Rule::And(mut rules) => {
                rules.push(other);
                Rule::And(rules)
            }
            rule => Rule::And(vec![rule, other]),
        }
    }

    /// True where at least one rule is true. Nested `Or`s are flattened.
    pub fn or(self, other: Rule) -> Rule {
        match self {
            Rule::Or(mut rules) => {
                rules.push(other);
                Rule::Or(rules)
            }
            rule => Rule::Or(vec![rule, other]),
        }
    }

    pub fn xor(self, other: Rule) -> Rule {
        Rule::Xor(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Rule {
        Rule::Not(Box::new(self))
    }

    pub fn is_satisfied(
        &self,
        index: usize,
        record: Option<&TradingRecord>,
    ) -> Result<bool, StochtraderError> {
        rule_eval::evaluate(self, index, record)
    }

    /// Every indicator the rule reads, in the order encountered.
    pub fn indicator_kinds(&self) -> Vec<IndicatorKind> {
        let mut kinds = Vec::new();
        collect_kinds(self, &mut kinds);
        kinds
    }
}

fn push_operand(operand: &Operand, kinds: &mut Vec<IndicatorKind>) {
    if let Operand::Indicator(indicator) = operand {
        kinds.push(indicator.kind());
    }
}

fn collect_kinds(rule: &Rule, kinds: &mut Vec<IndicatorKind>) {
    match rule {
        Rule::Over { left, right }
        | Rule::Under { left, right }
        | Rule::CrossedUp { left, right }
        | Rule::CrossedDown { left, right } => {
            push_operand(left, kinds);
            push_operand(right, kinds);
        }
        Rule::Between { operand, .. } => push_operand(operand, kinds),
        Rule::StopGain { price, .. } | Rule::StopLoss { price, .. } => kinds.push(price.kind()),
        Rule::Boolean(_) => {}
        Rule::And(rules) | Rule::Or(rules) => {
            for r in rules {
                collect_kinds(r, kinds);
            }
        }
        Rule::Xor(a, b) => {
            collect_kinds(a, kinds);
            collect_kinds(b, kinds);
        }
        Rule::Not(r) => collect_kinds(r, kinds),
    }
}
