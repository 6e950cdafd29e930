//! Basis-point representation for fee rates and ratios.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::CascadeError;

/// Denominator representing 100%.
pub(crate) const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u32` values can be stored; [`is_valid_percent`](Self::is_valid_percent)
/// tells whether the value is a meaningful percentage. Configuration types
/// reject values above 10 000.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::{Amount, BasisPoints, Rounding};
///
/// let ten_percent = BasisPoints::new(1_000);
/// let fee = ten_percent.apply(Amount::new(10_000), Rounding::Down);
/// assert_eq!(fee, Ok(Amount::new(1_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is within `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `10_000 - self`, or `None` when above 100%.
    #[must_use]
    pub const fn complement(&self) -> Option<Self> {
        match MAX_BPS.checked_sub(self.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `amount * self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`] if `amount * self` overflows `u128`.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(CascadeError::Overflow("basis points apply overflow")),
        };
        let divisor = MAX_BPS as u128;
        let floor = product / divisor;
        match rounding {
            Rounding::Down => Ok(Amount::new(floor)),
            Rounding::Up => {
                if product % divisor == 0 {
                    Ok(Amount::new(floor))
                } else {
                    Ok(Amount::new(floor + 1))
                }
            }
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
