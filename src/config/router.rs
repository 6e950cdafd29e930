//! Configuration of the swap-fee router.

use serde::{Deserialize, Serialize};

use crate::domain::BasisPoints;
use crate::error::CascadeError;

/// Protocol-fee parameters applied to every trade on a child pool.
///
/// # Validation
///
/// - `total_fee` must not exceed 10 000 basis points.
/// - `child_ratio` must not exceed 10 000 basis points.
///
/// # Examples
///
/// ```
/// use cascade_amm::config::RouterConfig;
/// use cascade_amm::domain::BasisPoints;
///
/// let config = RouterConfig::default();
/// assert_eq!(config.total_fee(), BasisPoints::new(1_000));
/// assert_eq!(config.child_ratio(), BasisPoints::new(7_500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    total_fee: BasisPoints,
    child_ratio: BasisPoints,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            total_fee: BasisPoints::new(1_000),
            child_ratio: BasisPoints::new(7_500),
        }
    }
}

impl RouterConfig {
    /// Creates a new `RouterConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidFee`] if either rate exceeds 100%.
    pub fn new(total_fee: BasisPoints, child_ratio: BasisPoints) -> crate::error::Result<Self> {
        let config = Self {
            total_fee,
            child_ratio,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidFee`] if either rate exceeds 100%.
    pub const fn validate(&self) -> crate::error::Result<()> {
        if !self.total_fee.is_valid_percent() {
            return Err(CascadeError::InvalidFee(
                "total protocol fee must not exceed 10000 basis points",
            ));
        }
        if !self.child_ratio.is_valid_percent() {
            return Err(CascadeError::InvalidFee(
                "child ratio must not exceed 10000 basis points",
            ));
        }
        Ok(())
    }

    /// Total fee rate charged on a child trade's notional.
    #[must_use]
    pub const fn total_fee(&self) -> BasisPoints {
        self.total_fee
    }

    /// Share of the total fee credited to the child pool.
    #[must_use]
    pub const fn child_ratio(&self) -> BasisPoints {
        self.child_ratio
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(RouterConfig::new(BasisPoints::ZERO, BasisPoints::MAX_PERCENT).is_ok());
        assert!(RouterConfig::new(BasisPoints::MAX_PERCENT, BasisPoints::ZERO).is_ok());
    }

    #[test]
    fn rejects_total_fee_above_100_percent() {
        let Err(e) = RouterConfig::new(BasisPoints::new(10_001), BasisPoints::new(5_000)) else {
            panic!("expected Err");
        };
        assert!(e.is_validation());
    }

    #[test]
    fn rejects_ratio_above_100_percent() {
        assert!(RouterConfig::new(BasisPoints::new(30), BasisPoints::new(10_001)).is_err());
    }
}
