//! Command and callback interface of the concentrated-liquidity engine.
//!
//! The engine itself (tick accounting, swap math, liquidity bookkeeping) is
//! an external collaborator. This crate drives it through
//! [`ExecutionEngine`] and is called back through [`PoolHook`], which the
//! swap-fee router implements.
//!
//! # Re-entrancy
//!
//! After executing a swap the engine invokes [`PoolHook::after_swap`],
//! passing itself as `&mut dyn ExecutionEngine` so the hook can issue a
//! nested [`ExecutionEngine::donate`] against another pool before the swap
//! settles. Any error returned by a hook aborts the engine command.

use alloy_primitives::B256;

use super::AssetLedger;
use crate::domain::{
    Account, Amount, BalanceDelta, BasisPoints, FeeTier, Liquidity, PoolId, PoolKey,
    SqrtPriceX96, Tick, TokenSide,
};

/// Current price state of an initialized pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    /// Current sqrt price.
    pub sqrt_price: SqrtPriceX96,
    /// Current tick (greatest tick whose sqrt price is `<=` the price).
    pub tick: Tick,
    /// The pool's static fee tier.
    pub fee: FeeTier,
}

/// Parameters of a liquidity addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyLiquidityParams {
    /// Lower tick bound (inclusive).
    pub tick_lower: Tick,
    /// Upper tick bound (exclusive).
    pub tick_upper: Tick,
    /// Liquidity to add.
    pub liquidity: Liquidity,
    /// Position salt distinguishing positions of the same owner and range.
    pub salt: B256,
}

/// Parameters of an exact-input swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParams {
    /// `true` sells `currency0` for `currency1`.
    pub zero_for_one: bool,
    /// Exact amount of the input currency the trader pays.
    pub amount_in: Amount,
}

impl SwapParams {
    /// Side of the currency the trader sells.
    #[must_use]
    pub const fn input_side(&self) -> TokenSide {
        if self.zero_for_one {
            TokenSide::A
        } else {
            TokenSide::B
        }
    }

    /// Side of the currency the trader buys.
    #[must_use]
    pub const fn output_side(&self) -> TokenSide {
        self.input_side().flip()
    }
}

/// Which leg of a trade carries the protocol fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeLeg {
    /// Charged on the amount the trader pays in.
    Input,
    /// Withheld from the proceeds the trader receives.
    Output,
}

/// Fee treatment requested by the hook before a swap executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeDecision {
    /// The engine charges the pool's own fee tier; nothing is withheld.
    Native,
    /// The engine ignores the pool's fee tier and applies this split.
    Override(FeeOverride),
}

/// Protocol-fee override for a single trade.
///
/// `total_fee` of the notional on `leg` is collected. `child_ratio` of it
/// is credited to the pool's own liquidity providers as an ordinary fee and
/// the remainder is withheld and deposited to the hook's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeOverride {
    /// Leg that carries the fee.
    pub leg: FeeLeg,
    /// Total fee rate applied to the notional.
    pub total_fee: BasisPoints,
    /// Share of the total fee kept by the local pool.
    pub child_ratio: BasisPoints,
}

/// Fee amounts actually applied by the engine to one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppliedFee {
    /// Total fee collected.
    pub total: Amount,
    /// Part credited to the pool's liquidity providers.
    pub local: Amount,
    /// Part withheld and deposited to the hook's account.
    pub withheld: Amount,
}

/// Result of an executed swap, handed to [`PoolHook::after_swap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOutcome {
    /// Trader's balance change (negative = paid).
    pub delta: BalanceDelta,
    /// Amount of the fee leg the fee was computed on.
    pub notional: Amount,
    /// Side of the currency the fee is denominated in.
    pub fee_side: TokenSide,
    /// Fee amounts the engine applied.
    pub fee: AppliedFee,
}

/// Command interface of the execution engine.
///
/// Every command is all-or-nothing at the level of the enclosing atomic
/// unit: an `Err` aborts the unit and the caller discards all state the
/// command touched (see [`Protocol`](crate::protocol::Protocol)).
pub trait ExecutionEngine {
    /// Account holding the engine's reserves on the ledger.
    #[must_use]
    fn account(&self) -> Account;

    /// Initializes a pool at `sqrt_price` and returns its starting tick.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::EngineCallFailure`] if the pool already
    /// exists or the hook rejects it.
    ///
    /// [`CascadeError::EngineCallFailure`]: crate::error::CascadeError::EngineCallFailure
    fn initialize(
        &mut self,
        key: &PoolKey,
        sqrt_price: SqrtPriceX96,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<Tick>;

    /// Adds liquidity owned by `owner`, pulling the required tokens from it.
    ///
    /// # Errors
    ///
    /// Fails if the pool is uninitialized, the range is invalid, the hook
    /// rejects it or `owner` cannot pay.
    fn modify_liquidity(
        &mut self,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
        owner: Account,
        ledger: &mut dyn AssetLedger,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<BalanceDelta>;

    /// Executes an exact-input swap for `trader`.
    ///
    /// # Errors
    ///
    /// Fails if the pool is uninitialized, liquidity is insufficient, the
    /// trader cannot pay, or either hook callback fails.
    fn swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        trader: Account,
        ledger: &mut dyn AssetLedger,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<TradeOutcome>;

    /// Credits `amount0`/`amount1` to the pool's in-range liquidity providers
    /// without moving its price, pulling the tokens from `donor`.
    ///
    /// # Errors
    ///
    /// Fails if the pool is uninitialized, has no active liquidity, or the
    /// donor cannot pay.
    fn donate(
        &mut self,
        key: &PoolKey,
        amount0: Amount,
        amount1: Amount,
        donor: Account,
        ledger: &mut dyn AssetLedger,
    ) -> crate::error::Result<BalanceDelta>;

    /// Price state of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotFound`](crate::error::CascadeError::NotFound)
    /// for an uninitialized pool.
    fn slot0(&self, id: PoolId) -> crate::error::Result<Slot0>;

    /// Active (in-range) liquidity of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotFound`](crate::error::CascadeError::NotFound)
    /// for an uninitialized pool.
    fn liquidity(&self, id: PoolId) -> crate::error::Result<Liquidity>;
}

/// Callbacks the engine issues to the contract named in a pool key's
/// `hooks` field.
pub trait PoolHook {
    /// Address the hook is deployed at; pool keys must name it.
    #[must_use]
    fn address(&self) -> alloy_primitives::Address;

    /// Called before a pool is initialized.
    ///
    /// # Errors
    ///
    /// Any error vetoes the initialization.
    fn before_initialize(
        &mut self,
        key: &PoolKey,
        sqrt_price: SqrtPriceX96,
    ) -> crate::error::Result<()>;

    /// Called before liquidity is added.
    ///
    /// # Errors
    ///
    /// Any error vetoes the liquidity change.
    fn before_add_liquidity(
        &mut self,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
    ) -> crate::error::Result<()>;

    /// Called before a swap executes; decides how its fee is charged.
    ///
    /// # Errors
    ///
    /// Any error vetoes the swap.
    fn before_swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
    ) -> crate::error::Result<FeeDecision>;

    /// Called after a swap executed but before it settles.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole swap.
    fn after_swap(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        ledger: &mut dyn AssetLedger,
        key: &PoolKey,
        params: &SwapParams,
        outcome: &TradeOutcome,
    ) -> crate::error::Result<()>;

    /// Called when a swap fails after [`before_swap`](Self::before_swap)
    /// accepted it and before [`after_swap`](Self::after_swap) ran.
    fn swap_aborted(&mut self, _key: &PoolKey) {}
}
