//! Identifiers of fungible assets, NFT collections and accounts.

use core::fmt;

use alloy_primitives::Address;

/// Any holder of balances: an externally owned account or a contract.
pub type Account = Address;

/// Identifier of a fungible asset.
///
/// Wraps a 20-byte [`Address`]. The all-zero identifier is reserved for the
/// network's native asset, which therefore always sorts first in a
/// canonically ordered pair.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use cascade_amm::domain::AssetId;
///
/// let asset = AssetId::new(Address::repeat_byte(0x11));
/// assert!(AssetId::NATIVE < asset);
/// assert!(AssetId::NATIVE.is_native());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssetId(Address);

impl AssetId {
    /// The network's native asset.
    pub const NATIVE: Self = Self(Address::ZERO);

    /// Wraps an address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the underlying address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }

    /// Returns `true` for the native asset.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0 == Address::ZERO
    }
}

impl From<Address> for AssetId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            return f.write_str("native");
        }
        write!(f, "{}", self.0)
    }
}

/// Identifier of an NFT collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CollectionId(Address);

impl CollectionId {
    /// Wraps an address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the underlying address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }

    /// Returns `true` for the all-zero identifier.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == Address::ZERO
    }
}

impl From<Address> for CollectionId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
