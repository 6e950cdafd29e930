//! In-memory collaborators for tests and local simulation.
//!
//! - [`InMemoryLedger`]: fungible balances per `(asset, holder)`.
//! - [`InMemoryVaultFactory`]: collections and vaults at CREATE2-predicted
//!   addresses.
//! - [`InMemoryEngine`]: pools, positions and fee accounting. Swaps fill at
//!   the pool's current price and never cross ticks.
//!
//! Enabled by the `simulation` feature (on by default).

mod engine;
mod ledger;
mod vaults;

pub use engine::{EngineCall, InMemoryEngine, PoolState, PositionKey};
pub use ledger::InMemoryLedger;
pub use vaults::{DeployedCollection, InMemoryVaultFactory};
