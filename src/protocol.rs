//! Protocol facade and atomic-unit boundary.
//!
//! [`Protocol`] owns every collaborator (engine, vault factory, ledger,
//! router, orchestrator). Each state-changing entry point runs on a cloned
//! draft of the whole state and replaces the live state only when it
//! succeeds, so an error at any step leaves nothing behind.

use alloy_primitives::{Address, B256};
use tracing::warn;

use crate::config::ProtocolConfig;
use crate::domain::{
    Account, AssetId, BalanceDelta, CollectionId, FeeTier, Liquidity, PoolId, PoolKey,
    SqrtPriceX96, Tick, TickSpacing,
};
use crate::error::CascadeError;
use crate::orchestrator::{
    Collaborators, DerivativeCreated, DerivativeOrchestrator, DerivativeParams, DerivativeRecord,
};
use crate::registry::PoolConfig;
use crate::router::SwapFeeRouter;
use crate::traits::{
    AssetLedger, ExecutionEngine, ModifyLiquidityParams, SwapParams, TradeOutcome, VaultFactory,
};

/// The whole protocol state.
#[derive(Debug, Clone)]
pub struct Protocol<E, V, L> {
    engine: E,
    vaults: V,
    ledger: L,
    router: SwapFeeRouter,
    orchestrator: DerivativeOrchestrator,
}

impl<E, V, L> Protocol<E, V, L>
where
    E: ExecutionEngine + Clone,
    V: VaultFactory + Clone,
    L: AssetLedger + Clone,
{
    /// Wires a router at `router_address` and an orchestrator transacting
    /// from `orchestrator_account` around the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error, or
    /// [`CascadeError::Validation`] if the two addresses coincide.
    pub fn new(
        config: &ProtocolConfig,
        router_address: Address,
        orchestrator_account: Account,
        engine: E,
        vaults: V,
        ledger: L,
    ) -> crate::error::Result<Self> {
        config.validate()?;
        if router_address == orchestrator_account {
            return Err(CascadeError::Validation(
                "router and orchestrator need distinct accounts",
            ));
        }
        let (router, registrar) = SwapFeeRouter::new(router_address, *config.router());
        let orchestrator =
            DerivativeOrchestrator::new(orchestrator_account, registrar, config.orchestrator().clone());
        Ok(Self {
            engine,
            vaults,
            ledger,
            router,
            orchestrator,
        })
    }

    /// Runs `op` on a draft of the state, keeping the draft only on success.
    fn atomically<T>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Self) -> crate::error::Result<T>,
    ) -> crate::error::Result<T> {
        let mut draft = self.clone();
        match op(&mut draft) {
            Ok(value) => {
                *self = draft;
                Ok(value)
            }
            Err(error) => {
                warn!(operation, %error, "aborted");
                Err(error)
            }
        }
    }

    fn split(&mut self) -> (&mut DerivativeOrchestrator, Collaborators<'_>) {
        (
            &mut self.orchestrator,
            Collaborators {
                engine: &mut self.engine,
                vaults: &mut self.vaults,
                ledger: &mut self.ledger,
                router: &mut self.router,
            },
        )
    }

    /// Creates the root pool pairing `parent_asset` with the native asset.
    ///
    /// # Errors
    ///
    /// See [`DerivativeOrchestrator::register_root_pool`].
    pub fn register_root_pool(
        &mut self,
        parent_asset: AssetId,
        fee: FeeTier,
        tick_spacing: TickSpacing,
        sqrt_price: SqrtPriceX96,
    ) -> crate::error::Result<PoolKey> {
        self.atomically("register_root_pool", |p| {
            let (orchestrator, ctx) = p.split();
            orchestrator.register_root_pool(ctx, parent_asset, fee, tick_spacing, sqrt_price)
        })
    }

    /// Provisions a derivative paid for by `caller`.
    ///
    /// # Errors
    ///
    /// See [`DerivativeOrchestrator::create_derivative`].
    pub fn create_derivative(
        &mut self,
        caller: Account,
        params: &DerivativeParams,
    ) -> crate::error::Result<DerivativeCreated> {
        self.atomically("create_derivative", |p| {
            let (orchestrator, ctx) = p.split();
            orchestrator.create_derivative(ctx, caller, params)
        })
    }

    /// Adds liquidity owned by `owner` to a registered pool.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::NotConfigured`] if the router does not know the
    ///   pool.
    /// - Any engine or ledger error.
    pub fn add_liquidity(
        &mut self,
        owner: Account,
        key: &PoolKey,
        tick_lower: Tick,
        tick_upper: Tick,
        liquidity: Liquidity,
    ) -> crate::error::Result<BalanceDelta> {
        let params = ModifyLiquidityParams {
            tick_lower,
            tick_upper,
            liquidity,
            salt: B256::ZERO,
        };
        self.atomically("add_liquidity", |p| {
            p.engine
                .modify_liquidity(key, &params, owner, &mut p.ledger, &mut p.router)
        })
    }

    /// Executes a swap for `trader`, routing child-pool fees upward.
    ///
    /// # Errors
    ///
    /// Any engine, router or ledger error; a failed parent donation
    /// aborts the whole trade.
    pub fn swap(
        &mut self,
        trader: Account,
        key: &PoolKey,
        params: &SwapParams,
    ) -> crate::error::Result<TradeOutcome> {
        self.atomically("swap", |p| {
            p.engine
                .swap(key, params, trader, &mut p.ledger, &mut p.router)
        })
    }

    // -- Queries --------------------------------------------------------------

    /// Registered config of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotFound`] for an unregistered pool.
    pub fn pool_config(&self, id: PoolId) -> crate::error::Result<PoolConfig> {
        self.router.registry().get(id)
    }

    /// Root pool key and id of `parent_asset`.
    #[must_use]
    pub fn root_pool(&self, parent_asset: AssetId) -> Option<(PoolKey, PoolId)> {
        self.orchestrator
            .root_pool(parent_asset)
            .map(|key| (*key, key.id()))
    }

    /// Record of the derivative whose fungible asset is `asset`.
    #[must_use]
    pub fn derivative_for_vault(&self, asset: AssetId) -> Option<&DerivativeRecord> {
        self.orchestrator.derivative_for_vault(asset)
    }

    /// Fungible vault asset of an NFT collection.
    #[must_use]
    pub fn vault_for_nft(&self, collection: CollectionId) -> Option<AssetId> {
        self.vaults.vault_for(collection)
    }

    /// The execution engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// The vault factory.
    #[must_use]
    pub const fn vaults(&self) -> &V {
        &self.vaults
    }

    /// The asset ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access, outside any atomic unit, for funding accounts.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// The swap-fee router.
    #[must_use]
    pub const fn router(&self) -> &SwapFeeRouter {
        &self.router
    }

    /// The derivative orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &DerivativeOrchestrator {
        &self.orchestrator
    }
}
