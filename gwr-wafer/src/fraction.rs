// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Exact fault-fraction thresholds.
//!
//! A [FaultFraction] is held as a reduced [Ratio] so that `3/30` and `0.1`
//! describe exactly the same threshold and floor to the same number of
//! allowed faults for any chip size.

use std::fmt;
use std::str::FromStr;

use num::rational::Ratio;

use crate::types::{WaferError, WaferResult};

/// Largest denominator considered when snapping an `f64` to a rational.
const MAX_DENOMINATOR: u64 = 1_000_000_000_000;

/// Distance within which an `f64` is taken to be equal to a convergent.
const SNAP_TOLERANCE: f64 = 1e-12;

/// Enough iterations to reach [MAX_DENOMINATOR] for any value.
const MAX_CONVERGENTS: usize = 64;

/// Maximum number of digits after the decimal point that can be parsed
/// without overflowing the denominator.
const MAX_DECIMAL_PLACES: usize = 18;

/// The largest acceptable proportion of faulty tiles in a chip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaultFraction(Ratio<u64>);

impl FaultFraction {
    /// `numerator / denominator`, which must lie in `[0, 1]`.
    pub fn new(numerator: u64, denominator: u64) -> WaferResult<Self> {
        if denominator == 0 {
            return Err(WaferError::InvalidProbability(format!(
                "fault fraction {numerator}/0 has a zero denominator"
            )));
        }
        if numerator > denominator {
            return Err(WaferError::InvalidProbability(format!(
                "fault fraction {numerator}/{denominator} is greater than 1"
            )));
        }
        Ok(Self(Ratio::new(numerator, denominator)))
    }

    /// A threshold that accepts any chip.
    #[must_use]
    pub fn one() -> Self {
        Self(Ratio::new(1, 1))
    }

    /// Convert a floating-point threshold.
    ///
    /// The value is replaced by the first continued fraction convergent
    /// within [SNAP_TOLERANCE] of it, which recovers the intended rational
    /// for values such as `4.0 / 30.0` whose binary representation falls
    /// just below the exact value. Values with no such convergent take the
    /// last convergent whose denominator fits in [MAX_DENOMINATOR].
    pub fn from_f64(value: f64) -> WaferResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(WaferError::InvalidProbability(format!(
                "fault fraction {value} is not in [0, 1]"
            )));
        }

        // Convergent recurrence seeded with h(-2)/k(-2) = 0/1, h(-1)/k(-1) = 1/0
        let (mut h_prev, mut k_prev) = (0_u64, 1_u64);
        let (mut h, mut k) = (1_u64, 0_u64);
        let mut x = value;
        for _ in 0..MAX_CONVERGENTS {
            let a = x.floor();
            let a_int = a as u64;
            let next = a_int
                .checked_mul(h)
                .and_then(|v| v.checked_add(h_prev))
                .zip(a_int.checked_mul(k).and_then(|v| v.checked_add(k_prev)));
            let Some((h_next, k_next)) = next else {
                break;
            };
            if k_next > MAX_DENOMINATOR {
                break;
            }
            (h_prev, k_prev, h, k) = (h, k, h_next, k_next);

            if (value - h as f64 / k as f64).abs() <= SNAP_TOLERANCE {
                return Self::new(h, k);
            }

            let remainder = x - a;
            if remainder <= 0.0 {
                break;
            }
            x = 1.0 / remainder;
        }

        // The first convergent (`floor(value) / 1`) is always accepted, so
        // `h / k` is the closest convergent within [MAX_DENOMINATOR]
        Self::new(h, k)
    }

    #[must_use]
    pub fn numerator(&self) -> u64 {
        *self.0.numer()
    }

    #[must_use]
    pub fn denominator(&self) -> u64 {
        *self.0.denom()
    }

    #[must_use]
    pub fn as_ratio(&self) -> Ratio<u64> {
        self.0
    }

    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.numerator() as f64 / self.denominator() as f64
    }

    /// `floor(fraction * num_tiles)`, computed without rounding error.
    #[must_use]
    pub fn max_faults(&self, num_tiles: usize) -> usize {
        let product = u128::from(self.numerator()) * num_tiles as u128;
        // The fraction is at most 1 so the result is at most `num_tiles`
        (product / u128::from(self.denominator())) as usize
    }
}

impl TryFrom<f64> for FaultFraction {
    type Error = WaferError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl FromStr for FaultFraction {
    type Err = WaferError;

    /// Parse `"n/d"`, a decimal such as `"0.095"` or an integer.
    ///
    /// Decimals are parsed exactly, digit by digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid =
            || WaferError::InvalidProbability(format!("unable to parse fault fraction '{s}'"));

        if let Some((numerator, denominator)) = s.split_once('/') {
            let numerator = numerator.trim().parse::<u64>().map_err(|_| invalid())?;
            let denominator = denominator.trim().parse::<u64>().map_err(|_| invalid())?;
            return Self::new(numerator, denominator);
        }

        let (whole, decimals) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && decimals.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !decimals.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        // Trailing zeros do not change the value but may overflow the
        // denominator
        let decimals = decimals.trim_end_matches('0');
        if decimals.len() > MAX_DECIMAL_PLACES {
            return Err(WaferError::InvalidProbability(format!(
                "fault fraction '{s}' has more than {MAX_DECIMAL_PLACES} decimal places"
            )));
        }

        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };
        let denominator = 10_u64.pow(decimals.len() as u32);
        let fractional = if decimals.is_empty() {
            0
        } else {
            decimals.parse::<u64>().map_err(|_| invalid())?
        };
        let numerator = whole
            .checked_mul(denominator)
            .and_then(|v| v.checked_add(fractional))
            .ok_or_else(|| {
                WaferError::InvalidProbability(format!("fault fraction '{s}' is greater than 1"))
            })?;

        Self::new(numerator, denominator)
    }
}

impl fmt::Display for FaultFraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
