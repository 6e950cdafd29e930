//! Property-based tests using `proptest`.
//!
//! 1. **Fee split conservation**: child and parent shares always sum to the
//!    total, which never exceeds the notional.
//! 2. **Salt mining**: deterministic, and a mined identifier always
//!    satisfies the requested ordering.
//! 3. **Tick consistency**: `tick_at_sqrt_price(at_tick(t)) == t`.
//! 4. **Liquidity monotonicity**: more liquidity never needs fewer tokens,
//!    and rounding up never needs fewer tokens than rounding down.
//! 5. **Distribution conservation**: a distribution pays out exactly the
//!    distributor's balance.

use alloy_primitives::{Address, B256};
use proptest::prelude::*;

use crate::domain::{
    Amount, AssetId, BasisPoints, Liquidity, Rounding, SqrtPriceX96, Tick, TokenSide,
};
use crate::error::CascadeError;
use crate::math::{tick_at_sqrt_price, TickRangeLiquidityCalculator};
use crate::miner::{Create2Oracle, TokenOrderingMiner};
use crate::router::FeeSplit;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn bps_strategy() -> impl Strategy<Value = u32> {
    0u32..=10_000
}

fn notional_strategy() -> impl Strategy<Value = u128> {
    0u128..=1_000_000_000_000_000_000_000_000
}

fn tick_strategy() -> impl Strategy<Value = i32> {
    Tick::MIN.get()..=Tick::MAX.get()
}

fn tick(v: i32) -> Tick {
    let Ok(t) = Tick::new(v) else {
        panic!("valid tick");
    };
    t
}

// ---------------------------------------------------------------------------
// Property 1: Fee split conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_fee_split_conserves_total(
        notional in notional_strategy(),
        fee in bps_strategy(),
        ratio in bps_strategy(),
    ) {
        let Ok(split) = FeeSplit::compute(
            Amount::new(notional),
            BasisPoints::new(fee),
            BasisPoints::new(ratio),
        ) else {
            return Err(TestCaseError::fail("split within bounds must succeed"));
        };
        prop_assert_eq!(
            split.child_share.get() + split.parent_share.get(),
            split.total.get()
        );
        prop_assert!(split.total.get() <= notional);
    }

    #[test]
    fn prop_fee_split_monotonic_in_notional(
        a in notional_strategy(),
        b in notional_strategy(),
        fee in bps_strategy(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let ratio = BasisPoints::new(7_500);
        let (Ok(small), Ok(large)) = (
            FeeSplit::compute(Amount::new(lo), BasisPoints::new(fee), ratio),
            FeeSplit::compute(Amount::new(hi), BasisPoints::new(fee), ratio),
        ) else {
            return Err(TestCaseError::fail("split within bounds must succeed"));
        };
        prop_assert!(small.total <= large.total);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Salt mining
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mined_salt_satisfies_ordering(
        deployer in any::<[u8; 20]>(),
        init_code in any::<[u8; 32]>(),
        hint in any::<[u8; 32]>(),
        counterpart in any::<[u8; 20]>(),
        side_a in any::<bool>(),
    ) {
        let oracle = Create2Oracle::new(Address::from(deployer), B256::from(init_code));
        let counterpart = AssetId::new(Address::from(counterpart));
        let side = if side_a { TokenSide::A } else { TokenSide::B };
        let miner = TokenOrderingMiner::new(64);

        let first = miner.mine(&oracle, B256::from(hint), counterpart, side);
        let second = miner.mine(&oracle, B256::from(hint), counterpart, side);
        prop_assert_eq!(&first, &second);

        match first {
            Ok(mined) => {
                prop_assert!(TokenOrderingMiner::satisfies(mined.asset, counterpart, side));
                prop_assert!(mined.attempts >= 1 && mined.attempts <= 64);
                prop_assert_eq!(
                    mined.salt,
                    TokenOrderingMiner::candidate_salt(B256::from(hint), mined.attempts - 1)
                );
            }
            Err(CascadeError::SaltSearchExhausted { attempts }) => prop_assert_eq!(attempts, 64),
            Err(CascadeError::Validation(_)) => {
                prop_assert!(counterpart.is_native() && side == TokenSide::A);
            }
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Tick consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_tick_sqrt_price_roundtrip(t in tick_strategy()) {
        let t = tick(t);
        prop_assert_eq!(tick_at_sqrt_price(SqrtPriceX96::at_tick(t)), t);
    }

    #[test]
    fn prop_sqrt_price_monotonic(t in (Tick::MIN.get())..(Tick::MAX.get())) {
        let lower = SqrtPriceX96::at_tick(tick(t));
        let upper = SqrtPriceX96::at_tick(tick(t + 1));
        prop_assert!(lower < upper);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Liquidity monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_amounts_monotonic_in_liquidity(
        current in -5_000i32..=5_000,
        lower in -6_000i32..=0,
        width in 1i32..=6_000,
        a in 1u128..=1_000_000_000_000_000_000_000,
        b in 1u128..=1_000_000_000_000_000_000_000,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let sqrt_price = SqrtPriceX96::at_tick(tick(current));
        let (tick_lower, tick_upper) = (tick(lower), tick(lower + width));
        let amounts = |l: u128, r: Rounding| {
            TickRangeLiquidityCalculator::amounts_for_liquidity(
                sqrt_price,
                tick_lower,
                tick_upper,
                Liquidity::new(l),
                r,
            )
        };
        let (Ok(small), Ok(large), Ok(up)) = (
            amounts(lo, Rounding::Down),
            amounts(hi, Rounding::Down),
            amounts(hi, Rounding::Up),
        ) else {
            return Err(TestCaseError::fail("amounts within bounds must succeed"));
        };
        prop_assert!(small.amount0 <= large.amount0);
        prop_assert!(small.amount1 <= large.amount1);
        prop_assert!(large.amount0 <= up.amount0);
        prop_assert!(large.amount1 <= up.amount1);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Distribution conservation
// ---------------------------------------------------------------------------

#[cfg(feature = "simulation")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_distribution_pays_out_balance(
        balance in 0u128..=1_000_000_000_000_000_000_000,
        points in proptest::collection::vec(0u64..=1_000, 0..8),
    ) {
        use crate::distribution::FeeDistributor;
        use crate::simulation::InMemoryLedger;
        use crate::traits::AssetLedger;

        if !points.is_empty() && points.iter().all(|p| *p == 0) {
            return Ok(());
        }
        let owner = Address::repeat_byte(0xd0);
        let asset = AssetId::new(Address::repeat_byte(0x70));
        let recipients: Vec<Address> = (1..=points.len())
            .map(|i| Address::repeat_byte(u8::try_from(i).unwrap_or(u8::MAX)))
            .collect();
        let mut distributor = FeeDistributor::new(Address::repeat_byte(0xfd), owner);
        let mut ledger = InMemoryLedger::new();
        prop_assert_eq!(ledger.mint(asset, distributor.account(), Amount::new(balance)), Ok(()));
        prop_assert_eq!(distributor.set_fee_recipients(owner, &recipients, &points), Ok(()));

        let Ok(paid) = distributor.distribute(&mut ledger, asset) else {
            return Err(TestCaseError::fail("distribution must succeed"));
        };
        prop_assert_eq!(paid, Amount::new(balance));
        prop_assert!(ledger.balance_of(asset, distributor.account()).is_zero());
        prop_assert_eq!(ledger.total_supply(asset), Amount::new(balance));
    }
}
