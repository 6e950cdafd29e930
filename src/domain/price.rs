//! Human-scale exchange rate between the two currencies of a pool.

use core::fmt;

use crate::error::CascadeError;

/// Exchange rate `currency1 / currency0` as an `f64`.
///
/// Used by the tick helpers and for display; on-engine prices are always
/// [`SqrtPriceX96`](super::SqrtPriceX96).
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::Price;
///
/// let p = Price::new(0.01).unwrap_or(Price::ONE);
/// assert!((p.inverse().map(|q| q.get()).unwrap_or(0.0) - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Price ratio of 1:1.
    pub const ONE: Self = Self(1.0);

    /// Price ratio of zero.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new `Price`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidPrice`] if the value is negative, NaN,
    /// or infinite.
    pub fn new(value: f64) -> crate::error::Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CascadeError::InvalidPrice("price must be finite and non-negative"));
        }
        Ok(Self(value))
    }

    /// Returns the underlying `f64` value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Returns `1 / price`, i.e. the same rate quoted the other way round.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::DivisionByZero`] for a zero price.
    pub fn inverse(&self) -> crate::error::Result<Self> {
        if self.0 == 0.0 {
            return Err(CascadeError::DivisionByZero);
        }
        Self::new(1.0 / self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
