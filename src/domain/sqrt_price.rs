//! Q64.96 square-root price as used by the execution engine.

use core::fmt;

use alloy_primitives::U256;

use super::{Price, Tick};
use crate::error::CascadeError;

/// `sqrt(1.0001^MIN_TICK) * 2^96`, the smallest representable sqrt price.
const MIN_SQRT_PRICE: U256 = U256::from_limbs([0x1_0002_76a3, 0, 0, 0]);

/// `sqrt(1.0001^MAX_TICK) * 2^96`, the (exclusive) upper bound.
const MAX_SQRT_PRICE: U256 =
    U256::from_limbs([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// `2^96`.
pub(crate) const Q96: U256 = U256::from_limbs([0, 0x1_0000_0000, 0, 0]);

/// `sqrt(currency1 / currency0)` in Q64.96 fixed point.
///
/// Valid values lie in `[MIN, MAX)`, the sqrt prices of the extreme ticks.
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::{SqrtPriceX96, Tick};
///
/// assert_eq!(SqrtPriceX96::at_tick(Tick::ZERO), SqrtPriceX96::ONE);
/// assert!((SqrtPriceX96::ONE.to_price().get() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqrtPriceX96(U256);

impl SqrtPriceX96 {
    /// Smallest valid sqrt price (at [`Tick::MIN`]).
    pub const MIN: Self = Self(MIN_SQRT_PRICE);

    /// Exclusive upper bound (sqrt price at [`Tick::MAX`]).
    pub const MAX: Self = Self(MAX_SQRT_PRICE);

    /// Price 1:1 (`2^96`).
    pub const ONE: Self = Self(Q96);

    /// Creates a validated sqrt price.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidPrice`] unless `MIN <= value < MAX`.
    pub fn new(value: U256) -> crate::error::Result<Self> {
        if value < MIN_SQRT_PRICE || value >= MAX_SQRT_PRICE {
            return Err(CascadeError::InvalidPrice("sqrt price outside [MIN, MAX)"));
        }
        Ok(Self(value))
    }

    /// Exact sqrt price at a tick boundary.
    ///
    /// [`Tick::MAX`] maps to [`SqrtPriceX96::MAX`], the only value this
    /// constructor produces outside the half-open valid range.
    #[must_use]
    pub fn at_tick(tick: Tick) -> Self {
        Self(crate::math::sqrt_price_at_tick(tick))
    }

    /// Approximates the sqrt price for a human-scale price.
    ///
    /// Precision is limited to the `f64` mantissa; use [`at_tick`](Self::at_tick)
    /// when an exact grid price is wanted.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidPrice`] if the result is outside the
    /// valid range.
    pub fn from_price(price: Price) -> crate::error::Result<Self> {
        let sqrt = price.get().sqrt();
        let scaled = sqrt * 2f64.powi(64);
        if !scaled.is_finite() || scaled >= 2f64.powi(128) {
            return Err(CascadeError::InvalidPrice("price too large for sqrt price"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let high = scaled as u128;
        Self::new(U256::from(high) << 32_usize)
    }

    /// Returns the raw Q64.96 value.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Converts back to a human-scale price (`(value / 2^96)^2`).
    #[must_use]
    pub fn to_price(&self) -> Price {
        let mut value = 0.0_f64;
        for (i, limb) in self.0.as_limbs().iter().enumerate() {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
            let weight = 2f64.powi(64 * i as i32);
            #[allow(clippy::cast_precision_loss)]
            let part = *limb as f64 * weight;
            value += part;
        }
        let ratio = value / 2f64.powi(96);
        Price::new(ratio * ratio).unwrap_or(Price::ZERO)
    }
}

impl fmt::Display for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn one_is_two_pow_96() {
        assert_eq!(SqrtPriceX96::ONE.get(), U256::from(1u8) << 96_usize);
    }

    #[test]
    fn bounds_match_reference_values() {
        assert_eq!(SqrtPriceX96::MIN.get(), U256::from(4_295_128_739u64));
        let Ok(max) = "1461446703485210103287273052203988822378723970342".parse::<U256>() else {
            panic!("parse");
        };
        assert_eq!(SqrtPriceX96::MAX.get(), max);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(SqrtPriceX96::new(U256::ZERO).is_err());
        assert!(SqrtPriceX96::new(MAX_SQRT_PRICE).is_err());
        assert!(SqrtPriceX96::new(MIN_SQRT_PRICE).is_ok());
    }

    #[test]
    fn from_price_one_is_exact() {
        let Ok(p) = SqrtPriceX96::from_price(Price::ONE) else {
            panic!("expected Ok");
        };
        assert_eq!(p, SqrtPriceX96::ONE);
    }

    #[test]
    fn from_price_quarter() {
        let Ok(price) = Price::new(0.25) else {
            panic!("valid price");
        };
        let Ok(p) = SqrtPriceX96::from_price(price) else {
            panic!("expected Ok");
        };
        assert_eq!(p.get(), U256::from(1u8) << 95_usize);
    }

    #[test]
    fn from_price_zero_rejected() {
        assert!(SqrtPriceX96::from_price(Price::ZERO).is_err());
    }

    #[test]
    fn to_price_round_trip() {
        let Ok(price) = Price::new(100.0) else {
            panic!("valid price");
        };
        let Ok(p) = SqrtPriceX96::from_price(price) else {
            panic!("expected Ok");
        };
        assert!((p.to_price().get() - 100.0).abs() < 1e-9);
    }
}
