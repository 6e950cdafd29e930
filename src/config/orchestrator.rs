//! Configuration of the derivative-provisioning orchestrator.

use serde::{Deserialize, Serialize};

use crate::domain::{FeeTier, TickSpacing};
use crate::error::CascadeError;

/// Default cap on salt-mining attempts.
pub const DEFAULT_MAX_SALT_ITERATIONS: u64 = 100_000;

/// A fee tier together with the tick spacing it must be paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportedTier {
    /// Fee tier.
    pub fee: FeeTier,
    /// Tick spacing required for `fee`.
    pub tick_spacing: TickSpacing,
}

/// Limits and allow-lists for provisioning.
///
/// # Validation
///
/// - `max_salt_iterations` must be greater than zero.
/// - `supported_tiers` must not be empty, must not repeat a fee tier, and
///   each fee must be a valid percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    max_salt_iterations: u64,
    supported_tiers: Vec<SupportedTier>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let supported_tiers = [
            FeeTier::TIER_0_01_PERCENT,
            FeeTier::TIER_0_05_PERCENT,
            FeeTier::TIER_0_30_PERCENT,
            FeeTier::TIER_1_00_PERCENT,
        ]
        .into_iter()
        .filter_map(|fee| {
            fee.conventional_spacing()
                .map(|tick_spacing| SupportedTier { fee, tick_spacing })
        })
        .collect();
        Self {
            max_salt_iterations: DEFAULT_MAX_SALT_ITERATIONS,
            supported_tiers,
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new `OrchestratorConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidConfiguration`] or
    /// [`CascadeError::InvalidFee`] if validation fails.
    pub fn new(
        max_salt_iterations: u64,
        supported_tiers: Vec<SupportedTier>,
    ) -> crate::error::Result<Self> {
        let config = Self {
            max_salt_iterations,
            supported_tiers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InvalidConfiguration`] for a zero iteration cap,
    ///   an empty tier list or a duplicated fee tier.
    /// - [`CascadeError::InvalidFee`] if a fee exceeds 100%.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_salt_iterations == 0 {
            return Err(CascadeError::InvalidConfiguration(
                "max_salt_iterations must be greater than zero".to_owned(),
            ));
        }
        if self.supported_tiers.is_empty() {
            return Err(CascadeError::InvalidConfiguration(
                "at least one supported fee tier is required".to_owned(),
            ));
        }
        for (i, tier) in self.supported_tiers.iter().enumerate() {
            if !tier.fee.basis_points().is_valid_percent() {
                return Err(CascadeError::InvalidFee(
                    "fee tier must not exceed 10000 basis points",
                ));
            }
            if self.supported_tiers[..i].iter().any(|t| t.fee == tier.fee) {
                return Err(CascadeError::InvalidConfiguration(format!(
                    "fee tier {} listed twice",
                    tier.fee
                )));
            }
        }
        Ok(())
    }

    /// Upper bound on salt-mining attempts per derivative.
    #[must_use]
    pub const fn max_salt_iterations(&self) -> u64 {
        self.max_salt_iterations
    }

    /// Allowed `(fee, tick spacing)` pairs.
    #[must_use]
    pub fn supported_tiers(&self) -> &[SupportedTier] {
        &self.supported_tiers
    }

    /// Returns `true` if `fee` is allowed and paired with `tick_spacing`.
    #[must_use]
    pub fn supports(&self, fee: FeeTier, tick_spacing: TickSpacing) -> bool {
        self.supported_tiers
            .iter()
            .any(|t| t.fee == fee && t.tick_spacing == tick_spacing)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BasisPoints;

    fn spacing(v: i32) -> TickSpacing {
        let Ok(s) = TickSpacing::new(v) else {
            panic!("valid spacing");
        };
        s
    }

    #[test]
    fn default_tiers() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_salt_iterations(), 100_000);
        assert_eq!(config.supported_tiers().len(), 4);
        assert!(config.supports(FeeTier::TIER_0_30_PERCENT, spacing(60)));
        assert!(config.supports(FeeTier::TIER_1_00_PERCENT, spacing(200)));
        assert!(!config.supports(FeeTier::TIER_0_30_PERCENT, spacing(10)));
        assert!(!config.supports(FeeTier::new(BasisPoints::new(25)), spacing(60)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let tiers = OrchestratorConfig::default().supported_tiers().to_vec();
        assert!(OrchestratorConfig::new(0, tiers).is_err());
    }

    #[test]
    fn rejects_empty_tiers() {
        let Err(e) = OrchestratorConfig::new(10, Vec::new()) else {
            panic!("expected Err");
        };
        assert!(matches!(e, CascadeError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_duplicate_fee() {
        let tier = SupportedTier {
            fee: FeeTier::TIER_0_30_PERCENT,
            tick_spacing: spacing(60),
        };
        let other = SupportedTier {
            fee: FeeTier::TIER_0_30_PERCENT,
            tick_spacing: spacing(10),
        };
        assert!(OrchestratorConfig::new(10, vec![tier, other]).is_err());
    }
}
