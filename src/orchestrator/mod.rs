//! Derivative provisioning workflow.
//!
//! [`DerivativeOrchestrator::create_derivative`] turns one
//! [`DerivativeParams`] into a new collection, a pre-minted derivative
//! vault, a registered and initialized child pool, and a seeded liquidity
//! position, leaving the orchestrator's own balances empty.
//!
//! The orchestrator holds the router's [`Registrar`] and is the only writer
//! of pool configs. It does not roll back on failure itself: callers run it
//! inside an atomic unit such as [`Protocol`](crate::protocol::Protocol).

mod params;

use std::collections::BTreeMap;

use alloy_primitives::B256;
use tracing::{debug, info};

pub use params::{DerivativeCreated, DerivativeParams, DerivativeRecord};

use crate::config::OrchestratorConfig;
use crate::domain::{
    Account, AssetId, CollectionId, FeeTier, PoolKey, Rounding, SqrtPriceX96, TickSpacing,
};
use crate::error::CascadeError;
use crate::math::TickRangeLiquidityCalculator;
use crate::miner::{IdentifierOracle, TokenOrderingMiner};
use crate::registry::Registrar;
use crate::router::SwapFeeRouter;
use crate::traits::{AssetLedger, ExecutionEngine, ModifyLiquidityParams, VaultFactory};

/// Mutable access to the collaborators one orchestrator call drives.
pub struct Collaborators<'a> {
    /// Execution engine.
    pub engine: &'a mut dyn ExecutionEngine,
    /// Collection and vault deployer.
    pub vaults: &'a mut dyn VaultFactory,
    /// Asset balances.
    pub ledger: &'a mut dyn AssetLedger,
    /// The hook every created pool names.
    pub router: &'a mut SwapFeeRouter,
}

/// Derivative vault prediction that skips salts the factory already used
/// for a collection or a vault.
struct DeploymentOracle<'a> {
    vaults: &'a dyn VaultFactory,
}

impl IdentifierOracle for DeploymentOracle<'_> {
    fn predict(&self, salt: B256) -> AssetId {
        self.vaults.predict_derivative_vault(salt)
    }

    fn available(&self, salt: B256, asset: AssetId) -> bool {
        !self.vaults.is_vault(asset) && !self.vaults.is_collection(self.vaults.predict_collection(salt))
    }
}

/// Provisions root pools and derivatives.
#[derive(Debug)]
pub struct DerivativeOrchestrator {
    account: Account,
    registrar: Registrar,
    config: OrchestratorConfig,
    roots: BTreeMap<AssetId, PoolKey>,
    by_asset: BTreeMap<AssetId, DerivativeRecord>,
    by_collection: BTreeMap<CollectionId, AssetId>,
    events: Vec<DerivativeCreated>,
}

impl Clone for DerivativeOrchestrator {
    fn clone(&self) -> Self {
        Self {
            account: self.account,
            registrar: self.registrar.duplicate(),
            config: self.config.clone(),
            roots: self.roots.clone(),
            by_asset: self.by_asset.clone(),
            by_collection: self.by_collection.clone(),
            events: self.events.clone(),
        }
    }
}

impl DerivativeOrchestrator {
    /// Creates an orchestrator transacting from `account` and writing pool
    /// configs through `registrar`.
    #[must_use]
    pub const fn new(account: Account, registrar: Registrar, config: OrchestratorConfig) -> Self {
        Self {
            account,
            registrar,
            config,
            roots: BTreeMap::new(),
            by_asset: BTreeMap::new(),
            by_collection: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Account holding tokens in transit during provisioning.
    #[must_use]
    pub const fn account(&self) -> Account {
        self.account
    }

    /// Orchestrator settings.
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Root pool key of `parent_asset`.
    #[must_use]
    pub fn root_pool(&self, parent_asset: AssetId) -> Option<&PoolKey> {
        self.roots.get(&parent_asset)
    }

    /// Record of the derivative whose fungible asset is `asset`.
    #[must_use]
    pub fn derivative_for_vault(&self, asset: AssetId) -> Option<&DerivativeRecord> {
        self.by_asset.get(&asset)
    }

    /// Record of the derivative minted from `collection`.
    #[must_use]
    pub fn derivative_for_collection(&self, collection: CollectionId) -> Option<&DerivativeRecord> {
        self.by_collection
            .get(&collection)
            .and_then(|asset| self.by_asset.get(asset))
    }

    /// All derivative records, ordered by asset.
    pub fn derivatives(&self) -> impl Iterator<Item = &DerivativeRecord> {
        self.by_asset.values()
    }

    /// Pending notifications, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DerivativeCreated] {
        &self.events
    }

    /// Takes all pending notifications.
    pub fn drain_events(&mut self) -> Vec<DerivativeCreated> {
        std::mem::take(&mut self.events)
    }

    fn ensure_supported(&self, fee: FeeTier, tick_spacing: TickSpacing) -> crate::error::Result<()> {
        if !self.config.supports(fee, tick_spacing) {
            return Err(CascadeError::Validation(
                "unsupported fee tier and tick spacing pair",
            ));
        }
        Ok(())
    }

    /// Registers and initializes the root pool pairing `parent_asset` with
    /// the native asset.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Validation`] for a native parent or an unsupported
    ///   fee tier / tick spacing pair.
    /// - [`CascadeError::AlreadyRegistered`] if `parent_asset` already has a
    ///   root pool.
    /// - Any registry or engine error.
    pub fn register_root_pool(
        &mut self,
        ctx: Collaborators<'_>,
        parent_asset: AssetId,
        fee: FeeTier,
        tick_spacing: TickSpacing,
        sqrt_price: SqrtPriceX96,
    ) -> crate::error::Result<PoolKey> {
        if parent_asset.is_native() {
            return Err(CascadeError::Validation(
                "parent asset must not be the native asset",
            ));
        }
        if let Some(existing) = self.roots.get(&parent_asset) {
            return Err(CascadeError::AlreadyRegistered(existing.id()));
        }
        self.ensure_supported(fee, tick_spacing)?;
        let key = PoolKey::new(
            parent_asset,
            AssetId::NATIVE,
            fee,
            tick_spacing,
            ctx.router.address(),
        )?;
        ctx.router.register_root(&self.registrar, parent_asset, &key)?;
        let tick = ctx.engine.initialize(&key, sqrt_price, ctx.router)?;
        self.roots.insert(parent_asset, key);
        info!(pool = %key.id(), %parent_asset, %tick, "created root pool");
        Ok(key)
    }

    /// Provisions a derivative of `params.parent_asset` paid for by `caller`.
    ///
    /// # Flow
    ///
    /// 1. Validate the parameters and look up the parent's root pool.
    /// 2. Mine a salt placing the derivative asset on the requested side.
    /// 3. Deploy the collection and the derivative vault at that salt, the
    ///    whole supply minted to the orchestrator.
    /// 4. Register the child pool, then initialize it.
    /// 5. Pull the contribution from `caller` and add the seeded position.
    /// 6. Forward leftovers to the recipients and check nothing stays behind.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Validation`] / [`CascadeError::InvalidTickRange`]
    ///   for bad parameters, a parent without a root pool, or a position
    ///   needing more than the supply or contribution.
    /// - [`CascadeError::SaltSearchExhausted`] if no salt satisfies the
    ///   requested ordering.
    /// - [`CascadeError::AccountingInvariantViolation`] if a deployment lands
    ///   off its prediction or balances remain after provisioning.
    /// - Any collaborator error.
    pub fn create_derivative(
        &mut self,
        ctx: Collaborators<'_>,
        caller: Account,
        params: &DerivativeParams,
    ) -> crate::error::Result<DerivativeCreated> {
        params.validate()?;
        self.ensure_supported(params.fee, params.tick_spacing)?;
        let Some(root_key) = self.roots.get(&params.parent_asset).copied() else {
            return Err(CascadeError::Validation("parent asset has no root pool"));
        };
        let parent = params.parent_asset;

        let miner = TokenOrderingMiner::new(self.config.max_salt_iterations());
        let oracle = DeploymentOracle {
            vaults: &*ctx.vaults,
        };
        let mined = miner.mine(&oracle, params.salt_hint, parent, params.derivative_side)?;
        debug!(salt = %mined.salt, asset = %mined.asset, attempts = mined.attempts, "derivative salt");

        let collection = ctx
            .vaults
            .deploy_collection(&params.metadata, params.roles(), mined.salt)?;
        let asset = ctx.vaults.deploy_derivative_vault(
            ctx.ledger,
            collection,
            mined.salt,
            params.max_supply,
            self.account,
        )?;
        if asset != mined.asset {
            return Err(CascadeError::AccountingInvariantViolation(format!(
                "derivative vault deployed at {asset}, predicted {}",
                mined.asset
            )));
        }

        let child_key = PoolKey::new(
            asset,
            parent,
            params.fee,
            params.tick_spacing,
            ctx.router.address(),
        )?;
        if child_key.side_of(asset) != Some(params.derivative_side) {
            return Err(CascadeError::AccountingInvariantViolation(
                "derivative asset landed on the wrong side of the pool".to_owned(),
            ));
        }
        ctx.router.register_child(&self.registrar, &child_key, &root_key)?;
        ctx.engine.initialize(&child_key, params.sqrt_price, ctx.router)?;

        let amounts = TickRangeLiquidityCalculator::amounts_for_liquidity(
            params.sqrt_price,
            params.tick_lower,
            params.tick_upper,
            params.liquidity,
            Rounding::Up,
        )?;
        let derivative_side = params.derivative_side;
        let parent_side = derivative_side.flip();
        let (need_derivative, need_parent) = if derivative_side.is_a() {
            (amounts.amount0, amounts.amount1)
        } else {
            (amounts.amount1, amounts.amount0)
        };
        if need_derivative > params.max_supply {
            return Err(CascadeError::Validation(
                "position needs more derivative supply than is minted",
            ));
        }
        if need_parent > params.parent_contribution {
            return Err(CascadeError::Validation(
                "position needs more parent asset than is contributed",
            ));
        }

        ctx.ledger
            .transfer(parent, caller, self.account, params.parent_contribution)?;
        let position = ModifyLiquidityParams {
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            liquidity: params.liquidity,
            salt: B256::ZERO,
        };
        let delta = ctx.engine.modify_liquidity(
            &child_key,
            &position,
            self.account,
            ctx.ledger,
            ctx.router,
        )?;

        let derivative_left = params
            .max_supply
            .try_sub(&delta.paid(derivative_side), "unused derivative supply")?;
        let parent_left = params
            .parent_contribution
            .try_sub(&delta.paid(parent_side), "unused contribution")?;
        ctx.ledger
            .transfer(asset, self.account, params.derivative_recipient, derivative_left)?;
        ctx.ledger
            .transfer(parent, self.account, params.parent_refund_recipient, parent_left)?;
        self.ensure_emptied(ctx.ledger, &[asset, parent])?;

        let child_pool_id = child_key.id();
        self.by_asset.insert(
            asset,
            DerivativeRecord {
                derivative_asset: asset,
                collection,
                parent_asset: parent,
                child_pool_id,
                child_key,
            },
        );
        self.by_collection.insert(collection, asset);
        let created = DerivativeCreated {
            collection,
            asset,
            parent_asset: parent,
            child_pool_id,
        };
        self.events.push(created);
        info!(
            %collection,
            %asset,
            parent_asset = %parent,
            child_pool = %child_pool_id,
            "created derivative"
        );
        Ok(created)
    }

    fn ensure_emptied(
        &self,
        ledger: &dyn AssetLedger,
        assets: &[AssetId],
    ) -> crate::error::Result<()> {
        for asset in assets {
            let left = ledger.balance_of(*asset, self.account);
            if !left.is_zero() {
                return Err(CascadeError::AccountingInvariantViolation(format!(
                    "orchestrator still holds {left} of {asset}"
                )));
            }
        }
        Ok(())
    }
}
