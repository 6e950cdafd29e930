//! 512-bit intermediate multiplication and division.

use alloy_primitives::{Uint, U256};

use crate::domain::Rounding;
use crate::error::CascadeError;

type U512 = Uint<512, 8>;

fn widen(v: U256) -> U512 {
    let l = v.as_limbs();
    U512::from_limbs([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
}

fn narrow(v: U512) -> Option<U256> {
    let l = v.as_limbs();
    if l[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([l[0], l[1], l[2], l[3]]))
}

/// Computes `a * b / denominator` without intermediate overflow.
///
/// # Errors
///
/// - [`CascadeError::DivisionByZero`] if `denominator` is zero.
/// - [`CascadeError::Overflow`] if the result does not fit 256 bits.
pub fn mul_div(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    if denominator.is_zero() {
        return Err(CascadeError::DivisionByZero);
    }
    let product = widen(a) * widen(b);
    let d = widen(denominator);
    let mut quotient = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        quotient += U512::from(1u8);
    }
    narrow(quotient).ok_or(CascadeError::Overflow("mul_div result exceeds 256 bits"))
}

/// Divides with explicit rounding.
///
/// # Errors
///
/// Returns [`CascadeError::DivisionByZero`] if `denominator` is zero.
pub fn div_rounding(
    numerator: U256,
    denominator: U256,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    if denominator.is_zero() {
        return Err(CascadeError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    if rounding.is_up() && !(numerator % denominator).is_zero() {
        return Ok(quotient + U256::from(1u8));
    }
    Ok(quotient)
}

/// Narrows a 256-bit value to `u128`.
///
/// # Errors
///
/// Returns [`CascadeError::Overflow`] carrying `context` if the value does
/// not fit.
pub fn to_u128(v: U256, context: &'static str) -> crate::error::Result<u128> {
    let l = v.as_limbs();
    if l[2] != 0 || l[3] != 0 {
        return Err(CascadeError::Overflow(context));
    }
    Ok((u128::from(l[1]) << 64) | u128::from(l[0]))
}
