//! Top-level protocol configuration, loadable from TOML.

use serde::{Deserialize, Serialize};

use super::{OrchestratorConfig, RouterConfig};
use crate::error::CascadeError;

/// Complete configuration of a [`Protocol`](crate::protocol::Protocol).
///
/// Missing sections and fields fall back to their defaults.
///
/// # Examples
///
/// ```
/// use cascade_amm::config::ProtocolConfig;
///
/// let config = ProtocolConfig::from_toml_str(
///     r#"
///     [router]
///     total_fee = 500
///     child_ratio = 8000
///
///     [orchestrator]
///     max_salt_iterations = 5000
///     "#,
/// )
/// .expect("valid config");
/// assert_eq!(config.router().total_fee().get(), 500);
/// assert_eq!(config.orchestrator().max_salt_iterations(), 5_000);
/// assert_eq!(config.orchestrator().supported_tiers().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    router: RouterConfig,
    orchestrator: OrchestratorConfig,
}

impl ProtocolConfig {
    /// Creates a new `ProtocolConfig`.
    ///
    /// # Errors
    ///
    /// Propagates the validation error of either section.
    pub fn new(router: RouterConfig, orchestrator: OrchestratorConfig) -> crate::error::Result<Self> {
        let config = Self {
            router,
            orchestrator,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InvalidConfiguration`] if the document does not
    ///   parse.
    /// - Any validation error of the parsed sections.
    pub fn from_toml_str(source: &str) -> crate::error::Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| {
            CascadeError::InvalidConfiguration(format!("failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Propagates the validation error of either section.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.router.validate()?;
        self.orchestrator.validate()
    }

    /// Router section.
    #[must_use]
    pub const fn router(&self) -> &RouterConfig {
        &self.router
    }

    /// Orchestrator section.
    #[must_use]
    pub const fn orchestrator(&self) -> &OrchestratorConfig {
        &self.orchestrator
    }
}
