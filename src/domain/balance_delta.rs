//! Signed per-currency balance changes returned by engine commands.

use core::fmt;

use super::{Amount, TokenSide};
use crate::error::CascadeError;

/// Balance change of a pool interaction, seen from the caller.
///
/// Negative values are owed by the caller to the engine, positive values
/// are owed by the engine to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BalanceDelta {
    amount0: i128,
    amount1: i128,
}

impl BalanceDelta {
    /// No balance change.
    pub const ZERO: Self = Self {
        amount0: 0,
        amount1: 0,
    };

    /// Creates a delta from raw signed values.
    #[must_use]
    pub const fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }

    /// Builds a delta where the caller pays `paid0`/`paid1`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`] if an amount exceeds `i128::MAX`.
    pub fn owed_by_caller(paid0: Amount, paid1: Amount) -> crate::error::Result<Self> {
        Ok(Self::new(-paid0.to_signed()?, -paid1.to_signed()?))
    }

    /// Signed change of `currency0`.
    #[must_use]
    pub const fn amount0(&self) -> i128 {
        self.amount0
    }

    /// Signed change of `currency1`.
    #[must_use]
    pub const fn amount1(&self) -> i128 {
        self.amount1
    }

    /// Signed change on one side.
    #[must_use]
    pub const fn amount(&self, side: TokenSide) -> i128 {
        match side {
            TokenSide::A => self.amount0,
            TokenSide::B => self.amount1,
        }
    }

    /// Amount the caller pays on `side` (zero when the caller receives).
    #[must_use]
    pub const fn paid(&self, side: TokenSide) -> Amount {
        let v = self.amount(side);
        if v < 0 {
            Amount::new(v.unsigned_abs())
        } else {
            Amount::ZERO
        }
    }

    /// Amount the caller receives on `side` (zero when the caller pays).
    #[must_use]
    pub const fn received(&self, side: TokenSide) -> Amount {
        let v = self.amount(side);
        if v > 0 {
            Amount::new(v.unsigned_abs())
        } else {
            Amount::ZERO
        }
    }

    /// Component-wise checked sum.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`] if either component overflows.
    pub fn checked_add(&self, other: &Self) -> crate::error::Result<Self> {
        let amount0 = self
            .amount0
            .checked_add(other.amount0)
            .ok_or(CascadeError::Overflow("balance delta amount0"))?;
        let amount1 = self
            .amount1
            .checked_add(other.amount1)
            .ok_or(CascadeError::Overflow("balance delta amount1"))?;
        Ok(Self::new(amount0, amount1))
    }
}

impl fmt::Display for BalanceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.amount0, self.amount1)
    }
}
