//! In-memory execution engine.
//!
//! Pools are tracked per id with their price, active liquidity, the tokens
//! the engine holds for them and the fees credited to their providers.
//! Swaps execute at the pool's current price without moving it, which is
//! enough to exercise fee routing end to end.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use tracing::trace;

use crate::domain::{
    Account, Amount, BalanceDelta, Liquidity, PoolId, PoolKey, Rounding, SqrtPriceX96, Tick,
    TokenSide, Q96,
};
use crate::error::CascadeError;
use crate::math::{mul_div, tick_at_sqrt_price, to_u128, TickRangeLiquidityCalculator};
use crate::router::FeeSplit;
use crate::traits::{
    AppliedFee, AssetLedger, ExecutionEngine, FeeDecision, FeeLeg, ModifyLiquidityParams,
    PoolHook, Slot0, SwapParams, TradeOutcome,
};

/// Identifies one liquidity position: owner, range and salt.
pub type PositionKey = (Account, Tick, Tick, B256);

/// State of one initialized pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    /// Key the pool was initialized with.
    pub key: PoolKey,
    /// Current sqrt price.
    pub sqrt_price: SqrtPriceX96,
    /// Current tick.
    pub tick: Tick,
    /// Liquidity of positions whose range contains the current tick.
    pub liquidity: Liquidity,
    /// Tokens the engine holds for this pool, per side.
    pub reserves: [Amount; 2],
    /// Swap fees credited to the pool's providers, per side.
    pub fees_accrued: [Amount; 2],
    /// Donations received, per side (also counted in `fees_accrued`).
    pub donations: [Amount; 2],
    /// Liquidity per position.
    pub positions: BTreeMap<PositionKey, Liquidity>,
}

impl PoolState {
    /// Tokens held on `side`.
    #[must_use]
    pub const fn reserve(&self, side: TokenSide) -> Amount {
        self.reserves[index(side)]
    }

    /// Fees credited on `side`.
    #[must_use]
    pub const fn fees(&self, side: TokenSide) -> Amount {
        self.fees_accrued[index(side)]
    }

    /// Donations received on `side`.
    #[must_use]
    pub const fn donated(&self, side: TokenSide) -> Amount {
        self.donations[index(side)]
    }
}

/// A command the engine executed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    /// Pool initialization.
    Initialize {
        /// Pool initialized.
        pool: PoolId,
        /// Starting tick.
        tick: Tick,
    },
    /// Liquidity addition.
    ModifyLiquidity {
        /// Pool.
        pool: PoolId,
        /// Position owner.
        owner: Account,
        /// Liquidity added.
        liquidity: Liquidity,
    },
    /// Swap.
    Swap {
        /// Pool.
        pool: PoolId,
        /// Trader.
        trader: Account,
        /// Fee the engine applied.
        fee: AppliedFee,
    },
    /// Donation.
    Donate {
        /// Pool receiving the donation.
        pool: PoolId,
        /// Amount of `currency0`.
        amount0: Amount,
        /// Amount of `currency1`.
        amount1: Amount,
    },
}

/// Engine holding every pool in memory.
#[derive(Debug, Clone)]
pub struct InMemoryEngine {
    account: Account,
    pools: BTreeMap<PoolId, PoolState>,
    calls: Vec<EngineCall>,
}

const fn index(side: TokenSide) -> usize {
    match side {
        TokenSide::A => 0,
        TokenSide::B => 1,
    }
}

fn engine_failure(message: &str) -> CascadeError {
    CascadeError::EngineCallFailure(message.to_owned())
}

/// Output of `amount_in` at a constant sqrt price, rounded down.
fn quote(
    sqrt_price: SqrtPriceX96,
    zero_for_one: bool,
    amount_in: Amount,
) -> crate::error::Result<Amount> {
    let sp = sqrt_price.get();
    let input = U256::from(amount_in.get());
    let out = if zero_for_one {
        let step = mul_div(input, sp, Q96, Rounding::Down)?;
        mul_div(step, sp, Q96, Rounding::Down)?
    } else {
        let step = mul_div(input, Q96, sp, Rounding::Down)?;
        mul_div(step, Q96, sp, Rounding::Down)?
    };
    Ok(Amount::new(to_u128(out, "swap output")?))
}

/// Priced trade before settlement.
#[derive(Debug, Clone, Copy)]
struct Fill {
    amount_out: Amount,
    notional: Amount,
    fee_side: TokenSide,
    fee: AppliedFee,
}

fn signed_pair(side: TokenSide, on_side: i128, other: i128) -> BalanceDelta {
    match side {
        TokenSide::A => BalanceDelta::new(on_side, other),
        TokenSide::B => BalanceDelta::new(other, on_side),
    }
}

impl InMemoryEngine {
    /// Creates an engine holding reserves at `account`.
    #[must_use]
    pub const fn new(account: Account) -> Self {
        Self {
            account,
            pools: BTreeMap::new(),
            calls: Vec::new(),
        }
    }

    /// State of pool `id`, if initialized.
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<&PoolState> {
        self.pools.get(&id)
    }

    /// Number of initialized pools.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Commands executed so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    fn pool_mut(&mut self, id: PoolId) -> crate::error::Result<&mut PoolState> {
        self.pools.get_mut(&id).ok_or(CascadeError::NotFound(id))
    }

    fn ensure_hook(key: &PoolKey, hook: &dyn PoolHook) -> crate::error::Result<()> {
        if key.hooks() != hook.address() {
            return Err(CascadeError::EngineCallFailure(format!(
                "pool names hook {} but {} was supplied",
                key.hooks(),
                hook.address()
            )));
        }
        Ok(())
    }

    /// Prices a swap under `decision` and settles its transfers.
    fn price_and_settle(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        sqrt_price: SqrtPriceX96,
        decision: FeeDecision,
        accounts: (Account, Address),
        ledger: &mut dyn AssetLedger,
    ) -> crate::error::Result<(Fill, BalanceDelta)> {
        let amount_in = params.amount_in;
        let fill = match decision {
            FeeDecision::Native => {
                let total = key.fee().apply_to_amount(amount_in, Rounding::Down)?;
                let net_in = amount_in.try_sub(&total, "net input")?;
                Fill {
                    amount_out: quote(sqrt_price, params.zero_for_one, net_in)?,
                    notional: amount_in,
                    fee_side: params.input_side(),
                    fee: AppliedFee {
                        total,
                        local: total,
                        withheld: Amount::ZERO,
                    },
                }
            }
            FeeDecision::Override(fee) => match fee.leg {
                FeeLeg::Input => {
                    let split = FeeSplit::compute(amount_in, fee.total_fee, fee.child_ratio)?;
                    let net_in = amount_in.try_sub(&split.total, "net input")?;
                    Fill {
                        amount_out: quote(sqrt_price, params.zero_for_one, net_in)?,
                        notional: amount_in,
                        fee_side: params.input_side(),
                        fee: split.into(),
                    }
                }
                FeeLeg::Output => {
                    let gross = quote(sqrt_price, params.zero_for_one, amount_in)?;
                    let split = FeeSplit::compute(gross, fee.total_fee, fee.child_ratio)?;
                    Fill {
                        amount_out: gross.try_sub(&split.total, "net output")?,
                        notional: gross,
                        fee_side: params.output_side(),
                        fee: split.into(),
                    }
                }
            },
        };

        self.settle_trade(key, params, accounts, ledger, &fill)?;

        let delta = signed_pair(
            params.input_side(),
            -amount_in.to_signed()?,
            fill.amount_out.to_signed()?,
        );
        Ok((fill, delta))
    }

    /// Pays the trader and the hook out of pool reserves after a trade.
    fn settle_trade(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        (trader, hook): (Account, Address),
        ledger: &mut dyn AssetLedger,
        fill: &Fill,
    ) -> crate::error::Result<()> {
        let Fill {
            amount_out,
            fee,
            fee_side,
            ..
        } = *fill;
        let input = params.input_side();
        let output = params.output_side();
        let id = key.id();
        let account = self.account;
        let pool = self.pool_mut(id)?;

        let mut reserves = pool.reserves;
        let owed_out = if fee_side == output {
            amount_out.try_add(&fee.withheld, "swap payout")?
        } else {
            amount_out
        };
        reserves[index(input)] = reserves[index(input)].try_add(&params.amount_in, "reserve")?;
        reserves[index(output)] = reserves[index(output)]
            .checked_sub(&owed_out)
            .ok_or_else(|| engine_failure("insufficient liquidity for swap output"))?;
        if fee_side == input {
            reserves[index(input)] = reserves[index(input)].try_sub(&fee.withheld, "reserve")?;
        }

        ledger.transfer(key.currency(input), trader, account, params.amount_in)?;
        ledger.transfer(key.currency(output), account, trader, amount_out)?;
        ledger.transfer(key.currency(fee_side), account, hook, fee.withheld)?;

        pool.reserves = reserves;
        let slot = index(fee_side);
        pool.fees_accrued[slot] = pool.fees_accrued[slot].try_add(&fee.local, "accrued fees")?;
        Ok(())
    }
}

impl ExecutionEngine for InMemoryEngine {
    fn account(&self) -> Account {
        self.account
    }

    fn initialize(
        &mut self,
        key: &PoolKey,
        sqrt_price: SqrtPriceX96,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<Tick> {
        Self::ensure_hook(key, hook)?;
        let id = key.id();
        if self.pools.contains_key(&id) {
            return Err(CascadeError::EngineCallFailure(format!(
                "pool {id} already initialized"
            )));
        }
        hook.before_initialize(key, sqrt_price)?;
        let tick = tick_at_sqrt_price(sqrt_price);
        self.pools.insert(
            id,
            PoolState {
                key: *key,
                sqrt_price,
                tick,
                liquidity: Liquidity::ZERO,
                reserves: [Amount::ZERO; 2],
                fees_accrued: [Amount::ZERO; 2],
                donations: [Amount::ZERO; 2],
                positions: BTreeMap::new(),
            },
        );
        trace!(pool = %id, %tick, "initialized");
        self.calls.push(EngineCall::Initialize { pool: id, tick });
        Ok(tick)
    }

    fn modify_liquidity(
        &mut self,
        key: &PoolKey,
        params: &ModifyLiquidityParams,
        owner: Account,
        ledger: &mut dyn AssetLedger,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<BalanceDelta> {
        Self::ensure_hook(key, hook)?;
        let id = key.id();
        let sqrt_price = self.slot0(id)?.sqrt_price;
        if params.liquidity.is_zero() {
            return Err(CascadeError::Validation("liquidity delta must be non-zero"));
        }
        if params.tick_lower >= params.tick_upper {
            return Err(CascadeError::InvalidTickRange(
                "lower tick must be below upper tick",
            ));
        }
        let spacing = key.tick_spacing();
        if !params.tick_lower.is_aligned(spacing) || !params.tick_upper.is_aligned(spacing) {
            return Err(CascadeError::InvalidTickRange(
                "range bounds must be multiples of the tick spacing",
            ));
        }
        hook.before_add_liquidity(key, params)?;

        let amounts = TickRangeLiquidityCalculator::amounts_for_liquidity(
            sqrt_price,
            params.tick_lower,
            params.tick_upper,
            params.liquidity,
            Rounding::Up,
        )?;
        for (side, amount) in [(TokenSide::A, amounts.amount0), (TokenSide::B, amounts.amount1)] {
            let asset = key.currency(side);
            if ledger.balance_of(asset, owner) < amount {
                return Err(CascadeError::InsufficientBalance {
                    asset,
                    holder: owner,
                });
            }
        }

        let account = self.account;
        let pool = self.pool_mut(id)?;
        let reserve0 = pool.reserves[0].try_add(&amounts.amount0, "reserve0")?;
        let reserve1 = pool.reserves[1].try_add(&amounts.amount1, "reserve1")?;
        let in_range = params.tick_lower <= pool.tick && pool.tick < params.tick_upper;
        let active = if in_range {
            pool.liquidity
                .checked_add(&params.liquidity)
                .ok_or(CascadeError::Overflow("active liquidity"))?
        } else {
            pool.liquidity
        };
        let position_key = (owner, params.tick_lower, params.tick_upper, params.salt);
        let position = pool
            .positions
            .get(&position_key)
            .copied()
            .unwrap_or(Liquidity::ZERO)
            .checked_add(&params.liquidity)
            .ok_or(CascadeError::Overflow("position liquidity"))?;

        ledger.transfer(key.currency0(), owner, account, amounts.amount0)?;
        ledger.transfer(key.currency1(), owner, account, amounts.amount1)?;

        pool.reserves = [reserve0, reserve1];
        pool.liquidity = active;
        pool.positions.insert(position_key, position);
        trace!(pool = %id, %owner, liquidity = %params.liquidity, "modified liquidity");
        self.calls.push(EngineCall::ModifyLiquidity {
            pool: id,
            owner,
            liquidity: params.liquidity,
        });
        BalanceDelta::owed_by_caller(amounts.amount0, amounts.amount1)
    }

    fn swap(
        &mut self,
        key: &PoolKey,
        params: &SwapParams,
        trader: Account,
        ledger: &mut dyn AssetLedger,
        hook: &mut dyn PoolHook,
    ) -> crate::error::Result<TradeOutcome> {
        Self::ensure_hook(key, hook)?;
        let id = key.id();
        let sqrt_price = self.slot0(id)?.sqrt_price;
        let liquidity = self.liquidity(id)?;
        if params.amount_in.is_zero() {
            return Err(CascadeError::Validation("swap amount must be non-zero"));
        }
        if liquidity.is_zero() {
            return Err(engine_failure("swap against a pool without active liquidity"));
        }

        let decision = hook.before_swap(key, params)?;
        let accounts = (trader, hook.address());
        let (fill, delta) =
            match self.price_and_settle(key, params, sqrt_price, decision, accounts, ledger) {
                Ok(executed) => executed,
                Err(error) => {
                    hook.swap_aborted(key);
                    return Err(error);
                }
            };
        let outcome = TradeOutcome {
            delta,
            notional: fill.notional,
            fee_side: fill.fee_side,
            fee: fill.fee,
        };
        trace!(pool = %id, %trader, %delta, "swapped");
        hook.after_swap(self, ledger, key, params, &outcome)?;
        self.calls.push(EngineCall::Swap {
            pool: id,
            trader,
            fee: fill.fee,
        });
        Ok(outcome)
    }

    fn donate(
        &mut self,
        key: &PoolKey,
        amount0: Amount,
        amount1: Amount,
        donor: Account,
        ledger: &mut dyn AssetLedger,
    ) -> crate::error::Result<BalanceDelta> {
        let id = key.id();
        let account = self.account;
        let pool = self.pool_mut(id)?;
        if pool.liquidity.is_zero() {
            return Err(CascadeError::EngineCallFailure(format!(
                "donation to {id} without active liquidity"
            )));
        }
        let amounts = [amount0, amount1];
        let mut reserves = pool.reserves;
        let mut fees = pool.fees_accrued;
        let mut donations = pool.donations;
        for i in 0..2 {
            reserves[i] = reserves[i].try_add(&amounts[i], "reserve")?;
            fees[i] = fees[i].try_add(&amounts[i], "accrued fees")?;
            donations[i] = donations[i].try_add(&amounts[i], "donations")?;
        }

        ledger.transfer(key.currency0(), donor, account, amount0)?;
        ledger.transfer(key.currency1(), donor, account, amount1)?;

        pool.reserves = reserves;
        pool.fees_accrued = fees;
        pool.donations = donations;
        trace!(pool = %id, %donor, %amount0, %amount1, "donated");
        self.calls.push(EngineCall::Donate {
            pool: id,
            amount0,
            amount1,
        });
        BalanceDelta::owed_by_caller(amount0, amount1)
    }

    fn slot0(&self, id: PoolId) -> crate::error::Result<Slot0> {
        let pool = self.pools.get(&id).ok_or(CascadeError::NotFound(id))?;
        Ok(Slot0 {
            sqrt_price: pool.sqrt_price,
            tick: pool.tick,
            fee: pool.key.fee(),
        })
    }

    fn liquidity(&self, id: PoolId) -> crate::error::Result<Liquidity> {
        self.pools
            .get(&id)
            .map(|pool| pool.liquidity)
            .ok_or(CascadeError::NotFound(id))
    }
}
