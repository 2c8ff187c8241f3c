//! # Fixed-Point Decimal
//!
//! 18-digit fixed-point decimal backed by `U256`, used for voting power
//! percentages and delegator shares. All nodes must reproduce reward
//! arithmetic bit-identically, so floats are never used.
//!
//! ## Rounding
//!
//! - `mul` / `checked_quo`: round half-to-even at the 18th fractional digit
//! - `truncate_int`: floor
//! - `round_int`: round half-to-even

use crate::entities::Amount;
use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of fractional decimal digits.
pub const PRECISION: usize = 18;

fn precision_multiplier() -> U512 {
    U512::exp10(PRECISION)
}

/// Drop the fractional digits of a raw fixed-point value, rounding
/// half-to-even.
fn chop_precision_and_round(raw: U512) -> U512 {
    let (quo, rem) = raw.div_mod(precision_multiplier());
    if rem.is_zero() {
        return quo;
    }
    let half = U512::from(5u8) * U512::exp10(PRECISION - 1);
    match rem.cmp(&half) {
        Ordering::Less => quo,
        Ordering::Greater => quo + U512::one(),
        Ordering::Equal => {
            if (quo % U512::from(2u8)).is_zero() {
                quo
            } else {
                quo + U512::one()
            }
        }
    }
}

fn narrow(value: U512) -> U256 {
    U256::try_from(value).unwrap_or(U256::MAX)
}

fn to_amount(value: U512) -> Amount {
    if value.bits() > 128 {
        Amount::MAX
    } else {
        value.low_u128()
    }
}

/// Non-negative fixed-point decimal with 18 fractional digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Dec(U256);

impl Dec {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn one() -> Self {
        Self::from_int(1)
    }

    /// Whole-number decimal.
    pub fn from_int(value: Amount) -> Self {
        Self(narrow(U512::from(value) * precision_multiplier()))
    }

    /// `value * 10^-prec`, e.g. `new_with_prec(5, 1)` is `0.5`.
    pub fn new_with_prec(value: Amount, prec: usize) -> Self {
        if prec <= PRECISION {
            Self(narrow(U512::from(value) * U512::exp10(PRECISION - prec)))
        } else {
            Self(narrow(U512::from(value) / U512::exp10(prec - PRECISION)))
        }
    }

    /// Wrap a raw fixed-point value (already scaled by 10^18).
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(self, other: Dec) -> Dec {
        Dec(self.0.saturating_add(other.0))
    }

    pub fn checked_sub(self, other: Dec) -> Option<Dec> {
        self.0.checked_sub(other.0).map(Dec)
    }

    pub fn mul(self, other: Dec) -> Dec {
        Dec(narrow(chop_precision_and_round(self.0.full_mul(other.0))))
    }

    /// Multiply by a whole number; exact.
    pub fn mul_int(self, value: Amount) -> Dec {
        Dec(narrow(self.0.full_mul(U256::from(value))))
    }

    /// Divide, or `None` when `other` is zero.
    pub fn checked_quo(self, other: Dec) -> Option<Dec> {
        if other.is_zero() {
            return None;
        }
        let scaled = U512::from(self.0) * precision_multiplier() * precision_multiplier();
        let quo = scaled / U512::from(other.0);
        Some(Dec(narrow(chop_precision_and_round(quo))))
    }

    /// Integer part, discarding the fraction.
    pub fn truncate_int(self) -> Amount {
        to_amount(U512::from(self.0) / precision_multiplier())
    }

    /// Nearest integer, ties to even.
    pub fn round_int(self) -> Amount {
        to_amount(chop_precision_and_round(U512::from(self.0)))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = U512::from(self.0).div_mod(precision_multiplier());
        write!(f, "{}.{:0>width$}", int, frac.to_string(), width = PRECISION)
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}
