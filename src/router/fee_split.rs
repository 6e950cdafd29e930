//! Protocol-fee split between a child pool and its parent.

use crate::domain::{Amount, BasisPoints, Rounding};
use crate::error::CascadeError;
use crate::traits::AppliedFee;

/// Split of one trade's protocol fee.
///
/// ```text
/// total        = floor(notional * total_fee / 10_000)
/// child_share  = floor(total * child_ratio / 10_000)
/// parent_share = total - child_share
/// ```
///
/// Rounding remainders stay with the child, and
/// `child_share + parent_share == total` always holds.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::{Amount, BasisPoints};
/// use cascade_amm::router::FeeSplit;
///
/// let split = FeeSplit::compute(Amount::new(10_000), BasisPoints::new(1_000), BasisPoints::new(7_500))
///     .expect("valid split");
/// assert_eq!(split.total, Amount::new(1_000));
/// assert_eq!(split.child_share, Amount::new(750));
/// assert_eq!(split.parent_share, Amount::new(250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSplit {
    /// Total protocol fee collected from the trade.
    pub total: Amount,
    /// Part credited to the child pool's liquidity providers.
    pub child_share: Amount,
    /// Part donated to the parent pool's liquidity providers.
    pub parent_share: Amount,
}

impl FeeSplit {
    /// Splits the fee on `notional`.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::CapExceeded`] if the total fee exceeds the notional.
    /// - [`CascadeError::InvalidFee`] if `child_ratio` exceeds 100%.
    /// - [`CascadeError::Overflow`] if `notional * total_fee` overflows.
    pub fn compute(
        notional: Amount,
        total_fee: BasisPoints,
        child_ratio: BasisPoints,
    ) -> crate::error::Result<Self> {
        if !child_ratio.is_valid_percent() {
            return Err(CascadeError::InvalidFee(
                "child ratio must not exceed 10000 basis points",
            ));
        }
        let total = total_fee.apply(notional, Rounding::Down)?;
        if total > notional {
            return Err(CascadeError::CapExceeded {
                fee: total,
                notional,
            });
        }
        let child_share = child_ratio.apply(total, Rounding::Down)?;
        let parent_share = total.try_sub(&child_share, "parent fee share")?;
        Ok(Self {
            total,
            child_share,
            parent_share,
        })
    }
}

impl From<FeeSplit> for AppliedFee {
    fn from(split: FeeSplit) -> Self {
        Self {
            total: split.total,
            local: split.child_share,
            withheld: split.parent_share,
        }
    }
}
