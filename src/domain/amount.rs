//! Raw token amount with checked arithmetic.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CascadeError;

/// A raw token amount in the smallest unit (wei or equivalent).
///
/// `Amount` never interprets decimals. All `u128` values are valid amounts.
/// Arithmetic is checked: the `checked_*` methods return `None`, the
/// `try_*` methods return a [`CascadeError`] naming the failed operation.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::Amount;
///
/// let a = Amount::new(100);
/// let b = Amount::new(200);
/// assert_eq!(a.checked_add(&b), Some(Amount::new(300)));
/// assert!(a.try_sub(&b, "example").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[must_use]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Addition that reports overflow as [`CascadeError::Overflow`].
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`] carrying `context`.
    pub const fn try_add(&self, other: &Self, context: &'static str) -> crate::error::Result<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Ok(Self(v)),
            None => Err(CascadeError::Overflow(context)),
        }
    }

    /// Subtraction that reports underflow as [`CascadeError::Underflow`].
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Underflow`] carrying `context`.
    pub const fn try_sub(&self, other: &Self, context: &'static str) -> crate::error::Result<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Ok(Self(v)),
            None => Err(CascadeError::Underflow(context)),
        }
    }

    /// Converts to a signed delta value.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`] if the amount exceeds `i128::MAX`.
    pub const fn to_signed(&self) -> crate::error::Result<i128> {
        if self.0 > i128::MAX as u128 {
            return Err(CascadeError::Overflow("amount does not fit a signed delta"));
        }
        Ok(self.0 as i128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
