//! Exact-decimal value type with a NaN sentinel.
//!
//! `Num` wraps [`rust_decimal::Decimal`] and adds a dedicated `NaN` variant for
//! undefined results. Arithmetic is checked: overflow and division by zero
//! produce `NaN`, and `NaN` propagates through every operation. Every ordering
//! comparison involving `NaN` is false, and `NaN != NaN`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum Num {
    Value(Decimal),
    NaN,
}

impl Num {
    pub const ZERO: Num = Num::Value(Decimal::ZERO);
    pub const ONE: Num = Num::Value(Decimal::ONE);
    pub const HUNDRED: Num = Num::Value(Decimal::ONE_HUNDRED);

    pub fn is_nan(&self) -> bool {
        matches!(self, Num::NaN)
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self {
            Num::Value(d) => Some(*d),
            Num::NaN => None,
        }
    }

    /// Non-finite floats map to `NaN`.
    pub fn from_f64(value: f64) -> Num {
        Decimal::from_f64(value).map_or(Num::NaN, Num::Value)
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Num::Value(d) => d.to_f64().unwrap_or(f64::NAN),
            Num::NaN => f64::NAN,
        }
    }

    pub fn abs(self) -> Num {
        self.map(|d| Some(d.abs()))
    }

    /// Larger of the two values; `NaN` if either side is `NaN`.
    pub fn max(self, other: Num) -> Num {
        self.zip(other, |a, b| Some(a.max(b)))
    }

    /// Smaller of the two values; `NaN` if either side is `NaN`.
    pub fn min(self, other: Num) -> Num {
        self.zip(other, |a, b| Some(a.min(b)))
    }

    pub fn pow(self, exponent: Num) -> Num {
        self.zip(exponent, |a, b| a.checked_powd(b))
    }

    fn map(self, f: impl FnOnce(Decimal) -> Option<Decimal>) -> Num {
        match self {
            Num::Value(d) => f(d).map_or(Num::NaN, Num::Value),
            Num::NaN => Num::NaN,
        }
    }

    fn zip(self, other: Num, f: impl FnOnce(Decimal, Decimal) -> Option<Decimal>) -> Num {
        match (self, other) {
            (Num::Value(a), Num::Value(b)) => f(a, b).map_or(Num::NaN, Num::Value),
            _ => Num::NaN,
        }
    }
}

impl Default for Num {
    fn default() -> Self {
        Num::ZERO
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::Value(a), Num::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Num::Value(a), Num::Value(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a.checked_add(b))
    }
}

impl Sub for Num {
    type Output = Num;

    fn sub(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a.checked_sub(b))
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a.checked_mul(b))
    }
}

impl Div for Num {
    type Output = Num;

    /// `checked_div` returns `None` for a zero divisor.
    fn div(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a.checked_div(b))
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        self.map(|d| Some(-d))
    }
}

impl Sum for Num {
    fn sum<I: Iterator<Item = Num>>(iter: I) -> Num {
        iter.fold(Num::ZERO, |acc, n| acc + n)
    }
}

impl From<Decimal> for Num {
    fn from(value: Decimal) -> Self {
        Num::Value(value)
    }
}

impl From<i32> for Num {
    fn from(value: i32) -> Self {
        Num::Value(Decimal::from(value))
    }
}

impl From<i64> for Num {
    fn from(value: i64) -> Self {
        Num::Value(Decimal::from(value))
    }
}

impl From<usize> for Num {
    fn from(value: usize) -> Self {
        Num::Value(Decimal::from(value))
    }
}

impl FromStr for Num {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("nan") {
            return Ok(Num::NaN);
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Num::Value)
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Value(d) => fmt::Display::fmt(&d.normalize(), f),
            Num::NaN => f.write_str("NaN"),
        }
    }
}
