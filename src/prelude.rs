//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use cascade_amm::prelude::*;
//! ```

pub use crate::domain::{
    Account, Amount, AssetId, BalanceDelta, BasisPoints, CollectionId, FeeTier, Liquidity,
    PoolId, PoolKey, Rounding, SqrtPriceX96, Tick, TickSpacing, TokenSide,
};

pub use crate::traits::{AssetLedger, ExecutionEngine, PoolHook, SwapParams, VaultFactory};

pub use crate::config::{OrchestratorConfig, ProtocolConfig, RouterConfig};

pub use crate::error::{CascadeError, Result};

pub use crate::orchestrator::{DerivativeCreated, DerivativeOrchestrator, DerivativeParams};
pub use crate::protocol::Protocol;
pub use crate::registry::{PoolConfig, PoolConfigRegistry};
pub use crate::router::{FeeSplit, SwapFeeRouter};
