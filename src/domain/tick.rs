//! Discrete price points and tick spacing for concentrated liquidity.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CascadeError;

/// Minimum valid tick index.
const MIN_TICK: i32 = -887_272;

/// Maximum valid tick index.
const MAX_TICK: i32 = 887_272;

/// Largest tick spacing the engine accepts (`int16` max).
const MAX_TICK_SPACING: i32 = 32_767;

/// A discrete price point: `price = 1.0001^tick`.
///
/// Valid indices range from [`MIN`](Self::MIN) (`-887272`) to
/// [`MAX`](Self::MAX) (`887272`).
///
/// # Examples
///
/// ```
/// use cascade_amm::domain::{Tick, TickSpacing};
///
/// let tick = Tick::new(-125).unwrap_or(Tick::ZERO);
/// let spacing = TickSpacing::new(60).unwrap_or(TickSpacing::ONE);
/// assert_eq!(tick.align_down(spacing).map(|t| t.get()), Ok(-180));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Tick(i32);

impl Tick {
    /// Minimum valid tick (`-887272`).
    pub const MIN: Self = Self(MIN_TICK);

    /// Maximum valid tick (`887272`).
    pub const MAX: Self = Self(MAX_TICK);

    /// Tick where `price = 1.0`.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Tick` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidTick`] if `value` is outside
    /// `[-887272, 887272]`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_TICK || value > MAX_TICK {
            return Err(CascadeError::InvalidTick("tick out of range [-887272, 887272]"));
        }
        Ok(Self(value))
    }

    /// Returns the underlying `i32` tick index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns `true` if this tick is a multiple of `spacing`.
    #[must_use]
    pub const fn is_aligned(&self, spacing: TickSpacing) -> bool {
        self.0 % spacing.get() == 0
    }

    /// Rounds this tick down (towards negative infinity) to a multiple of
    /// `spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidTick`] if the aligned tick falls below
    /// [`Tick::MIN`].
    pub const fn align_down(&self, spacing: TickSpacing) -> crate::error::Result<Self> {
        let s = spacing.get();
        Self::new(self.0.div_euclid(s) * s)
    }

    /// Smallest tick usable as a position bound with this spacing.
    #[must_use]
    pub const fn min_usable(spacing: TickSpacing) -> Self {
        let s = spacing.get();
        Self((MIN_TICK / s) * s)
    }

    /// Largest tick usable as a position bound with this spacing.
    #[must_use]
    pub const fn max_usable(spacing: TickSpacing) -> Self {
        let s = spacing.get();
        Self((MAX_TICK / s) * s)
    }
}

impl TryFrom<i32> for Tick {
    type Error = CascadeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tick> for i32 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

/// Granularity of initializable ticks in a pool (`1..=32767`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TickSpacing(i32);

impl TickSpacing {
    /// Finest spacing.
    pub const ONE: Self = Self(1);

    /// Creates a validated tick spacing.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidTick`] unless `1 <= value <= 32767`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < 1 || value > MAX_TICK_SPACING {
            return Err(CascadeError::InvalidTick("tick spacing must be within [1, 32767]"));
        }
        Ok(Self(value))
    }

    /// Returns the raw spacing.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for TickSpacing {
    type Error = CascadeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TickSpacing> for i32 {
    fn from(spacing: TickSpacing) -> Self {
        spacing.0
    }
}

impl fmt::Display for TickSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
