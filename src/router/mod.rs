//! Swap-fee routing hook.
//!
//! [`SwapFeeRouter`] is the hook named by every pool this protocol creates.
//! It owns the [`PoolConfigRegistry`] and, on each trade:
//!
//! 1. **Pre-trade**: root pools keep the engine's native fee. Child pools
//!    get a [`FeeDecision::Override`] charging the configured protocol fee
//!    on whichever leg carries the shared asset.
//! 2. **Post-trade**: the router recomputes the [`FeeSplit`] from the
//!    executed notional, checks it against what the engine applied, and
//!    donates the parent share to the parent pool on the shared asset's
//!    side. A failed donation aborts the trade.
//!
//! Every fee unit collected from a child trade ends up either with the
//! child's liquidity providers or with the parent's.

mod fee_split;

use std::collections::BTreeMap;

use alloy_primitives::Address;
use tracing::debug;

pub use fee_split::FeeSplit;

use crate::config::RouterConfig;
use crate::domain::{Amount, AssetId, PoolId, PoolKey, SqrtPriceX96, TokenSide};
use crate::error::CascadeError;
use crate::registry::{PoolConfig, PoolConfigRegistry, Registrar, RegistryEvent};
use crate::traits::{
    AssetLedger, ExecutionEngine, FeeDecision, FeeLeg, FeeOverride, ModifyLiquidityParams,
    PoolHook, SwapParams, TradeOutcome,
};

/// Position of the router in the per-trade state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradePhase {
    /// No trade in flight.
    #[default]
    Idle,
    /// Pre-trade ran; waiting for the matching post-trade.
    Pending {
        /// Pool being traded.
        pool_id: PoolId,
        /// Fee treatment handed to the engine.
        decision: FeeDecision,
    },
}

/// The hook routing child-pool fees to parent pools.
#[derive(Debug, Clone)]
pub struct SwapFeeRouter {
    address: Address,
    config: RouterConfig,
    registry: PoolConfigRegistry,
    phase: TradePhase,
    routed_to_parent: BTreeMap<PoolId, Amount>,
}

impl SwapFeeRouter {
    /// Creates a router at `address` together with the single registrar
    /// capability for its registry.
    #[must_use]
    pub fn new(address: Address, config: RouterConfig) -> (Self, Registrar) {
        let (registry, registrar) = PoolConfigRegistry::new(address);
        let router = Self {
            address,
            config,
            registry,
            phase: TradePhase::Idle,
            routed_to_parent: BTreeMap::new(),
        };
        (router, registrar)
    }

    /// Router account; also the hook address pool keys must name.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Fee parameters.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Read access to the registry.
    #[must_use]
    pub const fn registry(&self) -> &PoolConfigRegistry {
        &self.registry
    }

    /// Current trade phase.
    #[must_use]
    pub const fn phase(&self) -> TradePhase {
        self.phase
    }

    /// Cumulative amount donated from `child` to its parent pool.
    #[must_use]
    pub fn routed_to_parent(&self, child: PoolId) -> Amount {
        self.routed_to_parent
            .get(&child)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Takes the registry's pending notifications.
    pub fn drain_registry_events(&mut self) -> Vec<RegistryEvent> {
        self.registry.drain_events()
    }

    /// Registers a root pool. See [`PoolConfigRegistry::register_root`].
    ///
    /// # Errors
    ///
    /// Propagates the registry's errors.
    pub fn register_root(
        &mut self,
        registrar: &Registrar,
        parent_asset: AssetId,
        key: &PoolKey,
    ) -> crate::error::Result<PoolConfig> {
        self.ensure_hooked(key)?;
        self.registry.register_root(registrar, parent_asset, key)
    }

    /// Registers a child pool. See [`PoolConfigRegistry::register_child`].
    ///
    /// # Errors
    ///
    /// Propagates the registry's errors.
    pub fn register_child(
        &mut self,
        registrar: &Registrar,
        key: &PoolKey,
        parent_key: &PoolKey,
    ) -> crate::error::Result<PoolConfig> {
        self.ensure_hooked(key)?;
        self.registry.register_child(registrar, key, parent_key)
    }

    /// Administrative registration entry point.
    ///
    /// With `has_parent = false` the key must pair a parent asset with the
    /// native asset and is registered as a root; otherwise it is registered
    /// as a child of `parent_key`.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Validation`] if `has_parent` and `parent_key`
    ///   disagree, or a root key has no native side.
    /// - Any error of the underlying registration.
    pub fn add_child(
        &mut self,
        registrar: &Registrar,
        key: &PoolKey,
        has_parent: bool,
        parent_key: Option<&PoolKey>,
    ) -> crate::error::Result<PoolConfig> {
        match (has_parent, parent_key) {
            (true, Some(parent)) => self.register_child(registrar, key, parent),
            (false, None) => {
                let parent_asset = match key.side_of(AssetId::NATIVE) {
                    Some(side) => key.currency(side.flip()),
                    None => {
                        return Err(CascadeError::Validation(
                            "root pool must pair the parent asset with the native asset",
                        ))
                    }
                };
                self.register_root(registrar, parent_asset, key)
            }
            (true, None) => Err(CascadeError::Validation(
                "child registration requires a parent pool key",
            )),
            (false, Some(_)) => Err(CascadeError::Validation(
                "root registration must not name a parent pool key",
            )),
        }
    }

    fn ensure_hooked(&self, key: &PoolKey) -> crate::error::Result<()> {
        if key.hooks() != self.address {
            return Err(CascadeError::Unauthorized);
        }
        Ok(())
    }

    fn configured(&self, key: &PoolKey) -> crate::error::Result<PoolConfig> {
        self.ensure_hooked(key)?;
        let id = key.id();
        self.registry
            .get(id)
            .map_err(|_| CascadeError::NotConfigured(id))
    }

    /// Decides the fee treatment of a trade about to execute.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::NotConfigured`] for an unregistered pool.
    /// - [`CascadeError::Unauthorized`] if the key names another hook.
    /// - [`CascadeError::AccountingInvariantViolation`] if a trade is
    ///   already in flight.
    pub fn pre_trade(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
    ) -> crate::error::Result<FeeDecision> {
        if self.phase != TradePhase::Idle {
            return Err(CascadeError::AccountingInvariantViolation(
                "pre-trade while another trade is in flight".to_owned(),
            ));
        }
        let config = self.configured(key)?;
        let decision = if config.has_parent() {
            let leg = if params.input_side() == config.local_shared_side() {
                FeeLeg::Input
            } else {
                FeeLeg::Output
            };
            FeeDecision::Override(FeeOverride {
                leg,
                total_fee: self.config.total_fee(),
                child_ratio: self.config.child_ratio(),
            })
        } else {
            FeeDecision::Native
        };
        let pool_id = key.id();
        debug!(pool = %pool_id, ?decision, "pre-trade");
        self.phase = TradePhase::Pending { pool_id, decision };
        Ok(decision)
    }

    /// Settles the fee split of an executed trade.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::AccountingInvariantViolation`] without a matching
    ///   pre-trade, or if the engine applied a different split.
    /// - Any error of the donation to the parent pool.
    pub fn post_trade(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        ledger: &mut dyn AssetLedger,
        key: &PoolKey,
        outcome: &TradeOutcome,
    ) -> crate::error::Result<()> {
        let TradePhase::Pending { pool_id, decision } = std::mem::take(&mut self.phase) else {
            return Err(CascadeError::AccountingInvariantViolation(
                "post-trade without a pending pre-trade".to_owned(),
            ));
        };
        if pool_id != key.id() {
            return Err(CascadeError::AccountingInvariantViolation(format!(
                "post-trade for {} while {pool_id} is pending",
                key.id()
            )));
        }

        let FeeDecision::Override(fee) = decision else {
            if !outcome.fee.withheld.is_zero() {
                return Err(CascadeError::AccountingInvariantViolation(
                    "engine withheld a fee from a root pool trade".to_owned(),
                ));
            }
            return Ok(());
        };

        let config = self.configured(key)?;
        if outcome.fee_side != config.local_shared_side() {
            return Err(CascadeError::AccountingInvariantViolation(
                "fee charged outside the shared asset".to_owned(),
            ));
        }
        let split = FeeSplit::compute(outcome.notional, fee.total_fee, fee.child_ratio)?;
        if split.total != outcome.fee.total
            || split.child_share != outcome.fee.local
            || split.parent_share != outcome.fee.withheld
        {
            return Err(CascadeError::AccountingInvariantViolation(format!(
                "engine applied {:?}, expected {split:?}",
                outcome.fee
            )));
        }
        debug!(
            pool = %pool_id,
            total = %split.total,
            child = %split.child_share,
            parent = %split.parent_share,
            "fee split"
        );

        if split.parent_share.is_zero() {
            return Ok(());
        }
        let Some(parent_key) = config.parent_pool_key() else {
            return Err(CascadeError::AccountingInvariantViolation(
                "child pool without parent key".to_owned(),
            ));
        };
        let (amount0, amount1) = match config.parent_shared_side() {
            TokenSide::A => (split.parent_share, Amount::ZERO),
            TokenSide::B => (Amount::ZERO, split.parent_share),
        };
        engine.donate(parent_key, amount0, amount1, self.address, ledger)?;

        let routed = self.routed_to_parent.entry(pool_id).or_insert(Amount::ZERO);
        *routed = routed.try_add(&split.parent_share, "routed fee counter")?;
        debug!(
            child = %pool_id,
            parent = %parent_key.id(),
            amount = %split.parent_share,
            "donated parent share"
        );
        Ok(())
    }

    /// Drops the pending pre-trade of `key` after the engine failed the
    /// swap. A pending trade on another pool is left untouched.
    pub fn abort_trade(&mut self, key: &PoolKey) {
        if let TradePhase::Pending { pool_id, .. } = self.phase {
            if pool_id == key.id() {
                debug!(pool = %pool_id, "trade aborted");
                self.phase = TradePhase::Idle;
            }
        }
    }
}

impl PoolHook for SwapFeeRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn before_initialize(
        &mut self,
        key: &PoolKey,
        _sqrt_price: SqrtPriceX96,
    ) -> crate::error::Result<()> {
        self.configured(key).map(|_| ())
    }

    fn before_add_liquidity(
        &mut self,
        key: &PoolKey,
        _params: &ModifyLiquidityParams,
    ) -> crate::error::Result<()> {
        self.configured(key).map(|_| ())
    }

    fn before_swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
    ) -> crate::error::Result<FeeDecision> {
        self.pre_trade(key, params)
    }

    fn after_swap(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        ledger: &mut dyn AssetLedger,
        key: &PoolKey,
        _params: &SwapParams,
        outcome: &TradeOutcome,
    ) -> crate::error::Result<()> {
        self.post_trade(engine, ledger, key, outcome)
    }

    fn swap_aborted(&mut self, key: &PoolKey) {
        self.abort_trade(key);
    }
}
