//! Validated configuration blueprints.
//!
//! Each struct follows the same pattern: a `new` constructor that runs
//! `validate()`, `serde` support with defaults for every field, and const
//! getters. [`ProtocolConfig`] bundles the sections and loads them from TOML.

mod orchestrator;
mod protocol;
mod router;

pub use orchestrator::{OrchestratorConfig, SupportedTier, DEFAULT_MAX_SALT_ITERATIONS};
pub use protocol::ProtocolConfig;
pub use router::RouterConfig;
