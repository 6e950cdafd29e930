//! Pool fee tiers built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, BasisPoints, Rounding, TickSpacing};

/// Static fee rate of a pool, part of its [`PoolKey`](super::PoolKey).
///
/// Any [`BasisPoints`] value can be wrapped; whether a tier may be used for
/// new pools is decided by the orchestrator's configured tier list. The
/// engine encodes fees in hundredths of a basis point ("pips"), see
/// [`to_pips`](Self::to_pips).
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::FeeTier;
///
/// let tier = FeeTier::TIER_0_30_PERCENT;
/// assert_eq!(tier.basis_points().get(), 30);
/// assert_eq!(tier.to_pips(), 3_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// 0.01% (1 bp).
    pub const TIER_0_01_PERCENT: Self = Self(BasisPoints::new(1));

    /// 0.05% (5 bp).
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% (30 bp).
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% (100 bp).
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    #[must_use]
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Fee in hundredths of a basis point, as stored in a pool key.
    #[must_use]
    pub const fn to_pips(&self) -> u32 {
        self.0.get().saturating_mul(100)
    }

    /// Computes the fee charged on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`](crate::error::CascadeError::Overflow)
    /// if the intermediate multiplication overflows.
    pub const fn apply_to_amount(
        &self,
        amount: Amount,
        rounding: Rounding,
    ) -> crate::error::Result<Amount> {
        self.0.apply(amount, rounding)
    }

    /// Conventional tick spacing paired with this tier, if it is a preset.
    #[must_use]
    pub fn conventional_spacing(&self) -> Option<TickSpacing> {
        let spacing = match self.0.get() {
            1 => 1,
            5 => 10,
            30 => 60,
            100 => 200,
            _ => return None,
        };
        TickSpacing::new(spacing).ok()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
