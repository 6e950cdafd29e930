//! Explicit rounding direction for integer division.

/// Rounding direction for divisions on amounts and prices.
///
/// Fee math rounds down so remainders stay with the pool; amounts a caller
/// must pay into the engine round up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction() {
        assert!(Rounding::Up.is_up());
        assert!(!Rounding::Down.is_up());
    }
}
