//! Fixed-point currency types.
//!
//! Balances accumulate from many tiny per-second accruals, so floating point
//! is off the table: every value is an integer count of micro-units
//! (1 currency unit = 1_000_000 micros). [`Amount`] is a quantity of
//! currency; [`Rate`] is micro-units earned per second.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Number of micro-units in one currency unit.
pub const MICROS_PER_UNIT: u64 = 1_000_000;

/// A non-negative currency amount in micro-units.
///
/// Serialized as a bare integer of micros. `Display` renders the decimal
/// form (`"1.50"` for 1_500_000 micros).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Construct from raw micro-units.
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Amount(micros)
    }

    /// Construct from whole currency units.
    #[inline]
    pub const fn from_units(units: u64) -> Self {
        Amount(units * MICROS_PER_UNIT)
    }

    /// Raw micro-unit count.
    #[inline]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Checked subtraction; `None` if the result would go negative.
    #[inline]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Saturating addition. Accrual never overflows in practice; saturating
    /// keeps the monotonicity invariant even if it did.
    #[inline]
    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    /// Whole currency units, truncating the fractional part.
    #[inline]
    pub fn whole_units(self) -> u64 {
        self.0 / MICROS_PER_UNIT
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / MICROS_PER_UNIT;
        let frac = self.0 % MICROS_PER_UNIT;
        if frac == 0 {
            return write!(f, "{units}");
        }
        let s = format!("{frac:06}");
        write!(f, "{units}.{}", s.trim_end_matches('0'))
    }
}

/// An accrual rate in micro-units per second.
///
/// Rates compose additively (boosts stack on the base rate) and multiply
/// with elapsed seconds to produce an [`Amount`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rate(u64);

impl Rate {
    pub const ZERO: Rate = Rate(0);

    /// Construct from micro-units per second.
    #[inline]
    pub const fn per_second(micros: u64) -> Self {
        Rate(micros)
    }

    /// Raw micro-units per second.
    #[inline]
    pub const fn micros_per_second(self) -> u64 {
        self.0
    }

    /// Amount earned over `seconds` at this rate.
    ///
    /// Computed in 128-bit to avoid intermediate overflow, then saturated
    /// into the `Amount` range.
    #[inline]
    pub fn for_seconds(self, seconds: u64) -> Amount {
        let micros = (self.0 as u128) * (seconds as u128);
        Amount(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    /// Amount earned over `millis` milliseconds at this rate.
    ///
    /// The product is taken in 128-bit before the divide, so sub-second
    /// elapsed time earns its exact share instead of truncating to whole
    /// seconds.
    #[inline]
    pub fn for_millis(self, millis: u64) -> Amount {
        let micros = (self.0 as u128) * (millis as u128) / 1_000;
        Amount(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    /// Saturating rate addition (boost application).
    #[inline]
    pub fn saturating_add(self, rhs: Rate) -> Rate {
        Rate(self.0.saturating_add(rhs.0))
    }
}

impl Add for Rate {
    type Output = Rate;

    fn add(self, rhs: Rate) -> Rate {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Rate {
    fn add_assign(&mut self, rhs: Rate) {
        *self = self.saturating_add(rhs);
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", Amount(self.0))
    }
}
