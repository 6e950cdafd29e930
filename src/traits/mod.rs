//! Trait abstractions for the external collaborators.
//!
//! The execution engine, the vault factory and the asset ledger are not
//! implemented by this crate; the orchestrator and the router consume them
//! through these traits. [`PoolHook`] is the reverse seam: the engine calls
//! it, the swap-fee router implements it.
//!
//! All traits are object safe so collaborators can be passed as
//! `&mut dyn Trait` across re-entrant calls.

mod engine;
mod ledger;
mod vault_factory;

pub use engine::{
    AppliedFee, ExecutionEngine, FeeDecision, FeeLeg, FeeOverride, ModifyLiquidityParams,
    PoolHook, Slot0, SwapParams, TradeOutcome,
};
pub use ledger::AssetLedger;
pub use vault_factory::{CollectionMetadata, CollectionRoles, VaultFactory};
