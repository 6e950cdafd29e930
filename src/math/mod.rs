//! Fixed-point arithmetic for pool pricing and liquidity sizing.
//!
//! - [`full_math`](mul_div): 512-bit intermediate `a * b / d` with explicit
//!   rounding.
//! - Tick helpers: exact Q64.96 sqrt prices per tick, `f64` price
//!   conversions and spacing alignment.
//! - [`TickRangeLiquidityCalculator`]: token amounts for a liquidity value
//!   over a tick range, and the inverse.

mod full_math;
mod liquidity_amounts;
mod tick_math;

pub use full_math::{div_rounding, mul_div, to_u128};
pub use liquidity_amounts::{PositionAmounts, TickRangeLiquidityCalculator};
pub use tick_math::{
    align_tick_to_spacing, price_at_tick, sqrt_price_at_tick, tick_at_price, tick_at_sqrt_price,
};
