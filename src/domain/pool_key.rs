//! Pool keys and the identifiers derived from them.

use core::fmt;

use alloy_primitives::{keccak256, Address, B256};

use super::{AssetId, FeeTier, TickSpacing};
use crate::error::CascadeError;

/// Which side of a canonically ordered pair an asset occupies.
///
/// Side `A` is `currency0` (the lower identifier), side `B` is `currency1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSide {
    /// `currency0`, the lower identifier.
    A,
    /// `currency1`, the higher identifier.
    B,
}

impl TokenSide {
    /// The opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Returns `true` for side `A`.
    #[must_use]
    pub const fn is_a(self) -> bool {
        matches!(self, Self::A)
    }
}

/// Opaque identifier of a pool: `keccak256(abi.encode(poolKey))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PoolId(B256);

impl PoolId {
    /// Wraps a raw 32-byte identifier.
    #[must_use]
    pub const fn new(raw: B256) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that identifies a pool on the execution engine.
///
/// The two currencies are canonically ordered at construction so
/// `currency0 < currency1` always holds and `(X, Y)` / `(Y, X)` produce the
/// same key.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use cascade_amm::domain::{AssetId, FeeTier, PoolKey, TickSpacing, TokenSide};
///
/// let parent = AssetId::new(Address::repeat_byte(0x22));
/// let spacing = TickSpacing::new(60).expect("valid spacing");
/// let key = PoolKey::new(parent, AssetId::NATIVE, FeeTier::TIER_0_30_PERCENT, spacing, Address::ZERO)
///     .expect("distinct currencies");
/// assert_eq!(key.currency0(), AssetId::NATIVE);
/// assert_eq!(key.side_of(parent), Some(TokenSide::B));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    currency0: AssetId,
    currency1: AssetId,
    fee: FeeTier,
    tick_spacing: TickSpacing,
    hooks: Address,
}

impl PoolKey {
    /// Creates a canonically ordered pool key.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Validation`] if both assets are the same.
    pub fn new(
        asset_x: AssetId,
        asset_y: AssetId,
        fee: FeeTier,
        tick_spacing: TickSpacing,
        hooks: Address,
    ) -> crate::error::Result<Self> {
        if asset_x == asset_y {
            return Err(CascadeError::Validation("pool key requires two distinct assets"));
        }
        let (currency0, currency1) = if asset_x < asset_y {
            (asset_x, asset_y)
        } else {
            (asset_y, asset_x)
        };
        Ok(Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        })
    }

    /// Lower-ordered currency (side A).
    #[must_use]
    pub const fn currency0(&self) -> AssetId {
        self.currency0
    }

    /// Higher-ordered currency (side B).
    #[must_use]
    pub const fn currency1(&self) -> AssetId {
        self.currency1
    }

    /// Static fee tier.
    #[must_use]
    pub const fn fee(&self) -> FeeTier {
        self.fee
    }

    /// Tick spacing.
    #[must_use]
    pub const fn tick_spacing(&self) -> TickSpacing {
        self.tick_spacing
    }

    /// Address of the hook contract that receives the pool's callbacks.
    #[must_use]
    pub const fn hooks(&self) -> Address {
        self.hooks
    }

    /// Returns the currency on the given side.
    #[must_use]
    pub const fn currency(&self, side: TokenSide) -> AssetId {
        match side {
            TokenSide::A => self.currency0,
            TokenSide::B => self.currency1,
        }
    }

    /// Returns the side `asset` occupies, if it belongs to this pool.
    #[must_use]
    pub fn side_of(&self, asset: AssetId) -> Option<TokenSide> {
        if asset == self.currency0 {
            Some(TokenSide::A)
        } else if asset == self.currency1 {
            Some(TokenSide::B)
        } else {
            None
        }
    }

    /// Returns `true` if `asset` is one of the pool's currencies.
    #[must_use]
    pub fn contains(&self, asset: AssetId) -> bool {
        self.side_of(asset).is_some()
    }

    /// Derives the pool identifier.
    ///
    /// Hashes the ABI encoding of the key: five 32-byte words holding
    /// `currency0`, `currency1`, the fee in pips, the sign-extended tick
    /// spacing and the hook address.
    #[must_use]
    pub fn id(&self) -> PoolId {
        let mut encoded = [0u8; 160];
        encoded[12..32].copy_from_slice(self.currency0.address().as_slice());
        encoded[44..64].copy_from_slice(self.currency1.address().as_slice());
        encoded[92..96].copy_from_slice(&self.fee.to_pips().to_be_bytes());
        let spacing = i64::from(self.tick_spacing.get());
        let fill = if spacing < 0 { 0xff } else { 0x00 };
        encoded[96..120].fill(fill);
        encoded[120..128].copy_from_slice(&spacing.to_be_bytes());
        encoded[140..160].copy_from_slice(self.hooks.as_slice());
        PoolId(keccak256(encoded))
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PoolKey({}/{}, {}, spacing {})",
            self.currency0, self.currency1, self.fee, self.tick_spacing
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn asset(byte: u8) -> AssetId {
        AssetId::new(Address::repeat_byte(byte))
    }

    fn spacing(v: i32) -> TickSpacing {
        let Ok(s) = TickSpacing::new(v) else {
            panic!("valid spacing");
        };
        s
    }

    fn key(x: AssetId, y: AssetId) -> PoolKey {
        let Ok(k) = PoolKey::new(x, y, FeeTier::TIER_0_30_PERCENT, spacing(60), Address::ZERO)
        else {
            panic!("valid key");
        };
        k
    }

    #[test]
    fn orders_currencies() {
        let k = key(asset(2), asset(1));
        assert_eq!(k.currency0(), asset(1));
        assert_eq!(k.currency1(), asset(2));
        assert_eq!(k.currency(TokenSide::B), asset(2));
    }

    #[test]
    fn rejects_identical_assets() {
        let result = PoolKey::new(
            asset(1),
            asset(1),
            FeeTier::TIER_0_30_PERCENT,
            spacing(60),
            Address::ZERO,
        );
        assert_eq!(
            result,
            Err(CascadeError::Validation("pool key requires two distinct assets"))
        );
    }

    #[test]
    fn side_lookup() {
        let k = key(asset(1), asset(2));
        assert_eq!(k.side_of(asset(1)), Some(TokenSide::A));
        assert_eq!(k.side_of(asset(2)), Some(TokenSide::B));
        assert_eq!(k.side_of(asset(3)), None);
        assert!(!k.contains(asset(3)));
        assert_eq!(TokenSide::A.flip(), TokenSide::B);
    }

    #[test]
    fn id_is_order_independent() {
        assert_eq!(key(asset(1), asset(2)).id(), key(asset(2), asset(1)).id());
    }

    #[test]
    fn id_depends_on_every_field() {
        let base = key(asset(1), asset(2));
        let Ok(other_fee) = PoolKey::new(
            asset(1),
            asset(2),
            FeeTier::TIER_1_00_PERCENT,
            spacing(60),
            Address::ZERO,
        ) else {
            panic!("valid key");
        };
        let Ok(other_spacing) = PoolKey::new(
            asset(1),
            asset(2),
            FeeTier::TIER_0_30_PERCENT,
            spacing(10),
            Address::ZERO,
        ) else {
            panic!("valid key");
        };
        let Ok(other_hooks) = PoolKey::new(
            asset(1),
            asset(2),
            FeeTier::TIER_0_30_PERCENT,
            spacing(60),
            Address::repeat_byte(9),
        ) else {
            panic!("valid key");
        };
        assert_ne!(base.id(), other_fee.id());
        assert_ne!(base.id(), other_spacing.id());
        assert_ne!(base.id(), other_hooks.id());
        assert_ne!(base.id(), key(asset(1), asset(3)).id());
    }

    #[test]
    fn id_matches_abi_word_layout() {
        let k = key(AssetId::NATIVE, asset(0xaa));
        let mut expected = Vec::with_capacity(160);
        expected.extend_from_slice(&[0u8; 32]);
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(&[0xaa; 20]);
        let mut fee = [0u8; 32];
        fee[28..].copy_from_slice(&3_000u32.to_be_bytes());
        expected.extend_from_slice(&fee);
        let mut ts = [0u8; 32];
        ts[28..].copy_from_slice(&60u32.to_be_bytes());
        expected.extend_from_slice(&ts);
        expected.extend_from_slice(&[0u8; 32]);
        assert_eq!(k.id().as_b256(), keccak256(&expected));
    }
}
