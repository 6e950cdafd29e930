//! Tick, price and sqrt-price conversions.
//!
//! Ticks follow the standard relationship `price = 1.0001^tick`. Two
//! families of helpers are provided:
//!
//! - [`price_at_tick`] / [`tick_at_price`]: `f64` conversions for
//!   human-scale prices (configuration, logging, tooling).
//! - [`sqrt_price_at_tick`] / [`tick_at_sqrt_price`]: exact Q64.96
//!   conversions matching the execution engine bit for bit.
//!
//! # Examples
//!
//! ```
//! use cascade_amm::domain::{Price, SqrtPriceX96, Tick};
//! use cascade_amm::math::{price_at_tick, tick_at_price, tick_at_sqrt_price};
//!
//! let tick = Tick::new(100).unwrap_or(Tick::ZERO);
//! let price = price_at_tick(tick).expect("valid tick produces valid price");
//! assert_eq!(tick_at_price(price).expect("valid price"), tick);
//! assert_eq!(tick_at_sqrt_price(SqrtPriceX96::at_tick(tick)), tick);
//! ```

use alloy_primitives::U256;

use crate::domain::{Price, SqrtPriceX96, Tick, TickSpacing};
use crate::error::CascadeError;

/// Base of the tick-price exponential: `price = BASE^tick`.
const BASE: f64 = 1.0001;

/// Tolerance for snapping a floating-point tick value to the nearest
/// integer, so that `tick -> price -> tick` round-trips.
const SNAP_EPSILON: f64 = 1e-9;

/// `2^128 / sqrt(1.0001)`, the ratio contributed by bit 0 of `|tick|`.
const RATIO_BIT_0: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// `2^128 / sqrt(1.0001^(2^i))` for bits 1 through 19 of `|tick|`.
const RATIO_STEPS: [u128; 19] = [
    0xfff9_7272_373d_4132_59a4_6990_580e_213a,
    0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc,
    0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0,
    0xffcb_9843_d60f_6159_c9db_5883_5c92_6644,
    0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0,
    0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861,
    0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053,
    0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4,
    0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54,
    0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3,
    0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9,
    0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825,
    0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5,
    0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7,
    0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6,
    0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9,
    0x005d_6af8_dedb_8119_6699_c329_225e_e604,
    0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98,
    0x0000_0000_048a_1703_91f7_dc42_444e_8fa2,
];

/// Computes the price at a given tick: `price = 1.0001^tick`.
///
/// # Errors
///
/// Returns [`CascadeError::InvalidPrice`] if the computed price is not
/// finite (cannot happen for ticks in range).
#[must_use = "this returns the computed price and does not modify state"]
pub fn price_at_tick(tick: Tick) -> crate::error::Result<Price> {
    Price::new(BASE.powf(f64::from(tick.get())))
}

/// Computes the greatest tick whose price is `<=` the given price.
///
/// Implements `floor(log_{1.0001}(price))`, snapping to the nearest integer
/// within `SNAP_EPSILON`.
///
/// # Errors
///
/// - [`CascadeError::InvalidPrice`] if `price` is zero.
/// - [`CascadeError::InvalidTick`] if the resulting tick is out of range.
#[must_use = "this returns the computed tick and does not modify state"]
pub fn tick_at_price(price: Price) -> crate::error::Result<Tick> {
    let p = price.get();
    if p <= 0.0 {
        return Err(CascadeError::InvalidPrice(
            "price must be positive for tick conversion",
        ));
    }

    let raw = p.ln() / BASE.ln();
    let rounded = raw.round();
    let tick_f64 = if (raw - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        raw.floor()
    };

    if !tick_f64.is_finite() || tick_f64.abs() > f64::from(i32::MAX) {
        return Err(CascadeError::InvalidTick(
            "price produces out-of-range tick value",
        ));
    }

    #[allow(clippy::cast_possible_truncation)]
    let tick_i32 = tick_f64 as i32;
    Tick::new(tick_i32)
}

fn ratio_at(tick: i32) -> U256 {
    let abs = tick.unsigned_abs();
    let mut ratio = if abs & 1 != 0 {
        U256::from(RATIO_BIT_0)
    } else {
        U256::from(1u8) << 128_usize
    };
    for (i, step) in RATIO_STEPS.iter().enumerate() {
        if abs & (2_u32 << i) != 0 {
            ratio = (ratio * U256::from(*step)) >> 128_usize;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }
    // Q128.128 -> Q64.96, rounding up.
    let rounded_up = !(ratio & U256::from(0xffff_ffff_u64)).is_zero();
    let shifted = ratio >> 32_usize;
    if rounded_up {
        shifted + U256::from(1u8)
    } else {
        shifted
    }
}

/// Exact `sqrt(1.0001^tick) * 2^96`.
///
/// Mirrors the execution engine's fixed-point derivation, including the
/// final round-up, so values can be compared for equality.
#[must_use]
pub fn sqrt_price_at_tick(tick: Tick) -> U256 {
    ratio_at(tick.get())
}

/// Greatest tick whose sqrt price is `<=` the given sqrt price.
#[must_use]
pub fn tick_at_sqrt_price(sqrt_price: SqrtPriceX96) -> Tick {
    let target = sqrt_price.get();
    let mut lo = Tick::MIN.get();
    let mut hi = Tick::MAX.get() - 1;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if ratio_at(mid) <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Tick::new(lo).unwrap_or(Tick::MIN)
}

/// Rounds `tick` down to the nearest multiple of `spacing`.
///
/// # Errors
///
/// Returns [`CascadeError::InvalidTick`] if the aligned tick falls below
/// [`Tick::MIN`].
pub fn align_tick_to_spacing(tick: Tick, spacing: TickSpacing) -> crate::error::Result<Tick> {
    tick.align_down(spacing)
}
