//! Liquidity units for concentrated positions.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Liquidity units in a concentrated position.
///
/// Distinct from [`Amount`](super::Amount): it measures virtual liquidity
/// `L` within a tick range, not a quantity of a specific token.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// assert_eq!(a.checked_add(&Liquidity::new(500)), Some(Liquidity::new(1_500)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
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
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_default() {
        assert_eq!(Liquidity::default(), Liquidity::ZERO);
        assert!(Liquidity::ZERO.is_zero());
        assert!(!Liquidity::new(500_000).is_zero());
    }

    #[test]
    fn add_and_sub() {
        let l = Liquidity::new(300);
        assert_eq!(l.checked_add(&Liquidity::new(200)), Some(Liquidity::new(500)));
        assert_eq!(l.checked_sub(&Liquidity::new(300)), Some(Liquidity::ZERO));
        assert_eq!(l.checked_sub(&Liquidity::new(301)), None);
        assert_eq!(Liquidity::new(u128::MAX).checked_add(&Liquidity::new(1)), None);
    }

    #[test]
    fn display() {
        assert_eq!(Liquidity::new(500_000).to_string(), "500000");
    }
}
