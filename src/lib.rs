//! # Cascade AMM
//!
//! Parent/child pool topology for concentrated-liquidity engines: one base
//! fungible asset spawns many derivative pools, and a slice of every
//! derivative pool's trading fee flows back into the base pool.
//!
//! The crate provides:
//!
//! - **Pool-config registry**: which pool is a root, which is a child, and
//!   which asset a child shares with its parent.
//! - **Swap-fee router**: the hook every pool names. It overrides the fee of
//!   child-pool trades, splits it, and donates the parent share to the root
//!   pool without moving its price.
//! - **Derivative orchestrator**: deploys a collection and its pre-minted
//!   derivative asset at a mined salt, creates and seeds the child pool, and
//!   forwards leftovers, as one atomic unit.
//! - **Token-ordering miner** and **tick-range liquidity calculator**.
//!
//! The execution engine, the asset ledger and the vault factory are external
//! collaborators, reached through [`traits`].
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `simulation` | yes | In-memory engine, ledger and vault factory |
//!
//! # Quick Start
//!
//! ```rust
//! use alloy_primitives::{Address, B256};
//! use cascade_amm::config::ProtocolConfig;
//! use cascade_amm::domain::{
//!     Amount, AssetId, FeeTier, Liquidity, SqrtPriceX96, Tick, TickSpacing, TokenSide,
//! };
//! use cascade_amm::orchestrator::DerivativeParams;
//! use cascade_amm::protocol::Protocol;
//! use cascade_amm::simulation::{InMemoryEngine, InMemoryLedger, InMemoryVaultFactory};
//! use cascade_amm::traits::{AssetLedger, CollectionMetadata};
//!
//! let parent = AssetId::new(Address::repeat_byte(0x50));
//! let caller = Address::repeat_byte(0xca);
//! let spacing = TickSpacing::new(60).expect("valid spacing");
//!
//! let mut protocol = Protocol::new(
//!     &ProtocolConfig::default(),
//!     Address::repeat_byte(0xee),
//!     Address::repeat_byte(0x0c),
//!     InMemoryEngine::new(Address::repeat_byte(0xe0)),
//!     InMemoryVaultFactory::new(Address::repeat_byte(0xfa)),
//!     InMemoryLedger::new(),
//! )
//! .expect("valid protocol");
//! protocol
//!     .ledger_mut()
//!     .mint(parent, caller, Amount::new(10_000))
//!     .expect("mint");
//!
//! // 1. Root pool: parent asset against the native asset.
//! protocol
//!     .register_root_pool(parent, FeeTier::TIER_0_30_PERCENT, spacing, SqrtPriceX96::ONE)
//!     .expect("root pool");
//!
//! // 2. Derivative pool seeded around price 1.
//! let params = DerivativeParams {
//!     parent_asset: parent,
//!     metadata: CollectionMetadata::default(),
//!     fee: FeeTier::TIER_0_30_PERCENT,
//!     tick_spacing: spacing,
//!     sqrt_price: SqrtPriceX96::ONE,
//!     tick_lower: Tick::new(-120).expect("valid tick"),
//!     tick_upper: Tick::new(120).expect("valid tick"),
//!     liquidity: Liquidity::new(500_000),
//!     parent_contribution: Amount::new(3_000),
//!     max_supply: Amount::new(50_000),
//!     nft_owner: Address::repeat_byte(1),
//!     nft_minter: Address::repeat_byte(2),
//!     derivative_recipient: Address::repeat_byte(3),
//!     parent_refund_recipient: Address::repeat_byte(4),
//!     salt_hint: B256::ZERO,
//!     derivative_side: TokenSide::A,
//! };
//! let created = protocol.create_derivative(caller, &params).expect("derivative");
//!
//! let config = protocol.pool_config(created.child_pool_id).expect("registered");
//! assert!(config.has_parent());
//! assert_eq!(config.shared_asset(), parent);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Protocol    │  atomic units: clone draft, commit on success
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐   mine salt    ┌──────────────┐
//! │ Orchestrator  │ ─────────────▶ │    Miner      │
//! └──────┬───────┘                └──────────────┘
//!        │ register / initialize / add liquidity
//!        ▼
//! ┌──────────────┐   callbacks    ┌──────────────┐
//! │    Engine     │ ◀────────────▶ │    Router     │──▶ Registry
//! └──────────────┘   donate       └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`AssetId`](domain::AssetId), [`PoolKey`](domain::PoolKey), [`Tick`](domain::Tick), etc. |
//! | [`math`] | Full-precision `mul_div`, tick math, [`TickRangeLiquidityCalculator`](math::TickRangeLiquidityCalculator) |
//! | [`traits`] | Collaborator seams: [`ExecutionEngine`](traits::ExecutionEngine), [`PoolHook`](traits::PoolHook), [`AssetLedger`](traits::AssetLedger), [`VaultFactory`](traits::VaultFactory) |
//! | [`config`] | Validated, TOML-loadable settings |
//! | [`registry`] | [`PoolConfigRegistry`](registry::PoolConfigRegistry) and its [`Registrar`](registry::Registrar) capability |
//! | [`router`] | [`SwapFeeRouter`](router::SwapFeeRouter) hook and [`FeeSplit`](router::FeeSplit) |
//! | [`miner`] | [`TokenOrderingMiner`](miner::TokenOrderingMiner) salt search |
//! | [`orchestrator`] | [`DerivativeOrchestrator`](orchestrator::DerivativeOrchestrator) workflow |
//! | [`distribution`] | [`FeeDistributor`](distribution::FeeDistributor) weighted reward splitter |
//! | [`protocol`] | [`Protocol`](protocol::Protocol) facade |
//! | [`error`] | [`CascadeError`](error::CascadeError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod math;
pub mod miner;
pub mod orchestrator;
pub mod prelude;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod traits;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;
