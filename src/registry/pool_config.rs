//! Per-pool topology record.

use crate::domain::{AssetId, PoolId, PoolKey, TokenSide};

/// Topology of one registered pool.
///
/// A root pool pairs a parent asset with the native asset. A child pool
/// pairs a derivative asset with its parent's shared asset and references
/// the parent's root pool by key. Records are immutable once registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    initialized: bool,
    parent_pool_key: Option<PoolKey>,
    shared_asset: AssetId,
    shared_is_local_side_a: bool,
    shared_is_parent_side_a: bool,
}

impl PoolConfig {
    pub(crate) fn root(shared_side: TokenSide, shared_asset: AssetId) -> Self {
        Self {
            initialized: true,
            parent_pool_key: None,
            shared_asset,
            shared_is_local_side_a: shared_side.is_a(),
            shared_is_parent_side_a: shared_side.is_a(),
        }
    }

    pub(crate) fn child(
        local_side: TokenSide,
        parent_side: TokenSide,
        parent_pool_key: PoolKey,
        shared_asset: AssetId,
    ) -> Self {
        Self {
            initialized: true,
            parent_pool_key: Some(parent_pool_key),
            shared_asset,
            shared_is_local_side_a: local_side.is_a(),
            shared_is_parent_side_a: parent_side.is_a(),
        }
    }

    /// Always `true` for a registered pool.
    #[must_use]
    pub const fn initialized(&self) -> bool {
        self.initialized
    }

    /// Returns `true` for child pools.
    #[must_use]
    pub const fn has_parent(&self) -> bool {
        self.parent_pool_key.is_some()
    }

    /// Root pool key of the parent, for child pools.
    #[must_use]
    pub const fn parent_pool_key(&self) -> Option<&PoolKey> {
        self.parent_pool_key.as_ref()
    }

    /// Identifier of the parent pool, for child pools.
    #[must_use]
    pub fn parent_pool_id(&self) -> Option<PoolId> {
        self.parent_pool_key.map(|k| k.id())
    }

    /// Asset shared with the parent pool (the parent asset itself for roots).
    #[must_use]
    pub const fn shared_asset(&self) -> AssetId {
        self.shared_asset
    }

    /// `true` if the shared asset is `currency0` of this pool.
    #[must_use]
    pub const fn shared_is_local_side_a(&self) -> bool {
        self.shared_is_local_side_a
    }

    /// `true` if the shared asset is `currency0` of the parent pool.
    #[must_use]
    pub const fn shared_is_parent_side_a(&self) -> bool {
        self.shared_is_parent_side_a
    }

    /// Side of the shared asset in this pool.
    #[must_use]
    pub const fn local_shared_side(&self) -> TokenSide {
        if self.shared_is_local_side_a {
            TokenSide::A
        } else {
            TokenSide::B
        }
    }

    /// Side of the shared asset in the parent pool.
    #[must_use]
    pub const fn parent_shared_side(&self) -> TokenSide {
        if self.shared_is_parent_side_a {
            TokenSide::A
        } else {
            TokenSide::B
        }
    }
}
