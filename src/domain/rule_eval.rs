//! Rule evaluation engine.
//!
//! Evaluates rules against indicator values and an optional trading record.
//!
//! # Evaluation Semantics
//!
//! - Comparison rules: Evaluate at the given index. Any comparison involving
//!   NaN is false.
//! - `CrossedUp`/`CrossedDown`: Require `index >= 1`, return `false` at index 0
//! - `StopGain`/`StopLoss`: `false` without a record or without an open trade
//! - `And`: Short-circuits on first `false`
//! - `Or`: Short-circuits on first `true`
//! - An out-of-range index read by an operand is an error, not `false`

use crate::domain::error::StochtraderError;
use crate::domain::num::Num;
use crate::domain::rule::Rule;
use crate::domain::trading_record::TradingRecord;
use crate::domain::trade::Order;

pub fn evaluate(
    rule: &Rule,
    index: usize,
    record: Option<&TradingRecord>,
) -> Result<bool, StochtraderError> {
    match rule {
        Rule::Over { left, right } => Ok(left.value(index)? > right.value(index)?),
        Rule::Under { left, right } => Ok(left.value(index)? < right.value(index)?),
        Rule::CrossedUp { left, right } => {
            if index == 0 {
                return Ok(false);
            }
            let left_curr = left.value(index)?;
            let right_curr = right.value(index)?;
            let left_prev = left.value(index - 1)?;
            let right_prev = right.value(index - 1)?;

            Ok(left_curr > right_curr && left_prev <= right_prev)
        }
        Rule::CrossedDown { left, right } => {
            if index == 0 {
                return Ok(false);
            }
            let left_curr = left.value(index)?;
            let right_curr = right.value(index)?;
            let left_prev = left.value(index - 1)?;
            let right_prev = right.value(index - 1)?;

            Ok(left_curr < right_curr && left_prev >= right_prev)
        }
        Rule::Between {
            operand,
            lower,
            upper,
        } => {
            let val = operand.value(index)?;
            Ok(val >= *lower && val <= *upper)
        }
        Rule::StopGain { price, gain_pct } => match open_entry(record) {
            Some(entry) => {
                let threshold = entry.price * (Num::ONE + *gain_pct / Num::HUNDRED);
                Ok(price.value(index)? >= threshold)
            }
            None => Ok(false),
        },
        Rule::StopLoss { price, loss_pct } => match open_entry(record) {
            Some(entry) => {
                let threshold = entry.price * (Num::ONE - *loss_pct / Num::HUNDRED);
                Ok(price.value(index)? <= threshold)
            }
            None => Ok(false),
        },
        Rule::Boolean(value) => Ok(*value),
        Rule::And(rules) => {
            for r in rules {
                if !evaluate(r, index, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Rule::Or(rules) => {
            for r in rules {
                if evaluate(r, index, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Rule::Xor(a, b) => Ok(evaluate(a, index, record)? != evaluate(b, index, record)?),
        Rule::Not(rule) => Ok(!evaluate(rule, index, record)?),
    }
}

fn open_entry(record: Option<&TradingRecord>) -> Option<&Order> {
    let trade = record?.current_trade();
    if trade.is_opened() { trade.entry() } else { None }
}
