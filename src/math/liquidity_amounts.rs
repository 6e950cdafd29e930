//! Token amounts backing a liquidity value over a tick range.
//!
//! With `sa`, `sb` the sqrt prices at the range bounds and `sp` the current
//! sqrt price:
//!
//! | Current price | `amount0` | `amount1` |
//! |---------------|-----------|-----------|
//! | `sp <= sa` | `L * (sb - sa) / (sa * sb)` | `0` |
//! | `sa < sp < sb` | `L * (sb - sp) / (sp * sb)` | `L * (sp - sa)` |
//! | `sp >= sb` | `0` | `L * (sb - sa)` |

use alloy_primitives::U256;

use super::full_math::{div_rounding, mul_div, to_u128};
use crate::domain::{Amount, Liquidity, Q96, Rounding, SqrtPriceX96, Tick};
use crate::error::CascadeError;

/// Token amounts of a concentrated-liquidity position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PositionAmounts {
    /// Amount of `currency0`.
    pub amount0: Amount,
    /// Amount of `currency1`.
    pub amount1: Amount,
}

/// Converts between a liquidity value and the token amounts it requires.
///
/// Stateless; all arithmetic is exact integer math on Q64.96 sqrt prices
/// with 512-bit intermediates.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::{Liquidity, Rounding, SqrtPriceX96, Tick};
/// use cascade_amm::math::TickRangeLiquidityCalculator;
///
/// let lower = Tick::new(-120).expect("valid tick");
/// let upper = Tick::new(120).expect("valid tick");
/// let amounts = TickRangeLiquidityCalculator::amounts_for_liquidity(
///     SqrtPriceX96::ONE,
///     lower,
///     upper,
///     Liquidity::new(500_000),
///     Rounding::Up,
/// )
/// .expect("valid range");
/// assert!(!amounts.amount0.is_zero() && !amounts.amount1.is_zero());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TickRangeLiquidityCalculator;

fn bounds(tick_lower: Tick, tick_upper: Tick) -> crate::error::Result<(U256, U256)> {
    if tick_lower >= tick_upper {
        return Err(CascadeError::InvalidTickRange(
            "lower tick must be below upper tick",
        ));
    }
    Ok((
        SqrtPriceX96::at_tick(tick_lower).get(),
        SqrtPriceX96::at_tick(tick_upper).get(),
    ))
}

fn amount0_delta(sa: U256, sb: U256, liquidity: u128, rounding: Rounding) -> crate::error::Result<U256> {
    let numerator = U256::from(liquidity) << 96_usize;
    let scaled = mul_div(numerator, sb - sa, sb, rounding)?;
    div_rounding(scaled, sa, rounding)
}

fn amount1_delta(sa: U256, sb: U256, liquidity: u128, rounding: Rounding) -> crate::error::Result<U256> {
    mul_div(U256::from(liquidity), sb - sa, Q96, rounding)
}

fn liquidity_from_amount0(sa: U256, sb: U256, amount0: Amount) -> crate::error::Result<U256> {
    let intermediate = mul_div(sa, sb, Q96, Rounding::Down)?;
    mul_div(U256::from(amount0.get()), intermediate, sb - sa, Rounding::Down)
}

fn liquidity_from_amount1(sa: U256, sb: U256, amount1: Amount) -> crate::error::Result<U256> {
    mul_div(U256::from(amount1.get()), Q96, sb - sa, Rounding::Down)
}

fn to_amount(v: U256) -> crate::error::Result<Amount> {
    Ok(Amount::new(to_u128(v, "token amount exceeds u128")?))
}

impl TickRangeLiquidityCalculator {
    /// Token amounts represented by `liquidity` over `[tick_lower, tick_upper)`
    /// at the current `sqrt_price`.
    ///
    /// Use [`Rounding::Up`] when sizing what a depositor must supply and
    /// [`Rounding::Down`] when sizing what a withdrawer receives.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InvalidTickRange`] if `tick_lower >= tick_upper`.
    /// - [`CascadeError::Overflow`] if an amount does not fit `u128`.
    pub fn amounts_for_liquidity(
        sqrt_price: SqrtPriceX96,
        tick_lower: Tick,
        tick_upper: Tick,
        liquidity: Liquidity,
        rounding: Rounding,
    ) -> crate::error::Result<PositionAmounts> {
        let (sa, sb) = bounds(tick_lower, tick_upper)?;
        let sp = sqrt_price.get();
        let l = liquidity.get();

        let (a0, a1) = if sp <= sa {
            (amount0_delta(sa, sb, l, rounding)?, U256::ZERO)
        } else if sp < sb {
            (
                amount0_delta(sp, sb, l, rounding)?,
                amount1_delta(sa, sp, l, rounding)?,
            )
        } else {
            (U256::ZERO, amount1_delta(sa, sb, l, rounding)?)
        };

        Ok(PositionAmounts {
            amount0: to_amount(a0)?,
            amount1: to_amount(a1)?,
        })
    }

    /// Largest liquidity that `amount0`/`amount1` can back over the range.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InvalidTickRange`] if `tick_lower >= tick_upper`.
    /// - [`CascadeError::Overflow`] if the liquidity does not fit `u128`.
    pub fn liquidity_for_amounts(
        sqrt_price: SqrtPriceX96,
        tick_lower: Tick,
        tick_upper: Tick,
        amount0: Amount,
        amount1: Amount,
    ) -> crate::error::Result<Liquidity> {
        let (sa, sb) = bounds(tick_lower, tick_upper)?;
        let sp = sqrt_price.get();

        let raw = if sp <= sa {
            liquidity_from_amount0(sa, sb, amount0)?
        } else if sp < sb {
            let l0 = liquidity_from_amount0(sp, sb, amount0)?;
            let l1 = liquidity_from_amount1(sa, sp, amount1)?;
            l0.min(l1)
        } else {
            liquidity_from_amount1(sa, sb, amount1)?
        };

        Ok(Liquidity::new(to_u128(raw, "liquidity exceeds u128")?))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick {v}");
        };
        t
    }

    fn amounts(price: SqrtPriceX96, lo: i32, hi: i32, l: u128, r: Rounding) -> PositionAmounts {
        let Ok(a) = TickRangeLiquidityCalculator::amounts_for_liquidity(
            price,
            tick(lo),
            tick(hi),
            Liquidity::new(l),
            r,
        ) else {
            panic!("expected Ok");
        };
        a
    }

    #[test]
    fn in_range_requires_both_tokens() {
        let a = amounts(SqrtPriceX96::ONE, -120, 120, 500_000, Rounding::Up);
        // L * (1 - 1.0001^-60) ~= 2991 on each side.
        assert!((2_985..=2_995).contains(&a.amount0.get()), "{}", a.amount0);
        assert!((2_985..=2_995).contains(&a.amount1.get()), "{}", a.amount1);
        assert!(a.amount0.get().abs_diff(a.amount1.get()) <= 2);
    }

    #[test]
    fn below_range_is_token0_only() {
        let price = SqrtPriceX96::at_tick(tick(-600));
        let a = amounts(price, -120, 120, 500_000, Rounding::Up);
        assert!(!a.amount0.is_zero());
        assert!(a.amount1.is_zero());
    }

    #[test]
    fn above_range_is_token1_only() {
        let price = SqrtPriceX96::at_tick(tick(600));
        let a = amounts(price, -120, 120, 500_000, Rounding::Up);
        assert!(a.amount0.is_zero());
        assert!(!a.amount1.is_zero());
    }

    #[test]
    fn price_at_lower_bound_counts_as_below() {
        let price = SqrtPriceX96::at_tick(tick(-120));
        let a = amounts(price, -120, 120, 500_000, Rounding::Down);
        assert!(a.amount1.is_zero());
    }

    #[test]
    fn rounding_up_never_undershoots() {
        let up = amounts(SqrtPriceX96::ONE, -60, 180, 123_456_789, Rounding::Up);
        let down = amounts(SqrtPriceX96::ONE, -60, 180, 123_456_789, Rounding::Down);
        assert!(up.amount0 >= down.amount0);
        assert!(up.amount1 >= down.amount1);
        assert!(up.amount0.get() - down.amount0.get() <= 1);
        assert!(up.amount1.get() - down.amount1.get() <= 1);
    }

    #[test]
    fn zero_liquidity_is_zero_amounts() {
        let a = amounts(SqrtPriceX96::ONE, -120, 120, 0, Rounding::Up);
        assert_eq!(a, PositionAmounts::default());
    }

    #[test]
    fn inverted_range_rejected() {
        let r = TickRangeLiquidityCalculator::amounts_for_liquidity(
            SqrtPriceX96::ONE,
            tick(120),
            tick(-120),
            Liquidity::new(1),
            Rounding::Up,
        );
        assert!(matches!(r, Err(CascadeError::InvalidTickRange(_))));
        let r = TickRangeLiquidityCalculator::liquidity_for_amounts(
            SqrtPriceX96::ONE,
            tick(60),
            tick(60),
            Amount::new(1),
            Amount::new(1),
        );
        assert!(matches!(r, Err(CascadeError::InvalidTickRange(_))));
    }

    #[test]
    fn liquidity_for_amounts_never_exceeds_source() {
        let a = amounts(SqrtPriceX96::ONE, -120, 120, 500_000, Rounding::Down);
        let Ok(l) = TickRangeLiquidityCalculator::liquidity_for_amounts(
            SqrtPriceX96::ONE,
            tick(-120),
            tick(120),
            a.amount0,
            a.amount1,
        ) else {
            panic!("expected Ok");
        };
        assert!(l.get() <= 500_000);
        assert!(l.get() + 1_000 >= 500_000);
    }

    #[test]
    fn liquidity_limited_by_scarcer_token() {
        let Ok(l) = TickRangeLiquidityCalculator::liquidity_for_amounts(
            SqrtPriceX96::ONE,
            tick(-120),
            tick(120),
            Amount::new(1_000_000),
            Amount::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert!(l.is_zero());
    }

    #[test]
    fn large_liquidity_amounts() {
        // 5e5 liquidity is tiny; 1e24 still fits comfortably.
        let a = amounts(
            SqrtPriceX96::ONE,
            -887_220,
            887_220,
            1_000_000_000_000_000_000_000_000,
            Rounding::Up,
        );
        assert!(a.amount0.get() > 0 && a.amount1.get() > 0);
    }
}
