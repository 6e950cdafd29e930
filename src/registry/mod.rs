//! Parent/child topology of registered pools.
//!
//! The registry is a flat `PoolId -> PoolConfig` table. Roots pair a parent
//! asset with the native asset; children pair a derivative with a root's
//! parent asset and point at the root by key. Only one level of nesting
//! exists: a child can never be a parent.
//!
//! Writes require the [`Registrar`] capability minted together with the
//! registry. Reads are open.

mod pool_config;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::Address;
use tracing::info;

pub use pool_config::PoolConfig;

use crate::domain::{AssetId, PoolId, PoolKey};
use crate::error::CascadeError;

/// Source of registry instance ids; never reused within a process.
static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Write capability for one [`PoolConfigRegistry`].
///
/// Minted exactly once by [`PoolConfigRegistry::new`]. Not `Clone`: whoever
/// holds it is the registry's single writer. It is bound to the registry
/// instance, not to its address, so a second registry at the same address
/// mints a capability the first one rejects.
#[derive(Debug, PartialEq, Eq)]
pub struct Registrar {
    registry: Address,
    instance: u64,
}

impl Registrar {
    /// Address of the registry this capability writes to.
    #[must_use]
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Copies the capability for a draft of the owning state.
    pub(crate) const fn duplicate(&self) -> Self {
        Self {
            registry: self.registry,
            instance: self.instance,
        }
    }
}

/// Notification emitted for every successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A pool config was stored.
    PoolRegistered {
        /// Registered pool.
        pool_id: PoolId,
        /// Parent pool for children.
        parent_pool_id: Option<PoolId>,
        /// Asset shared with the parent.
        shared_asset: AssetId,
    },
}

/// Table of pool configs keyed by pool id.
#[derive(Debug, Clone)]
pub struct PoolConfigRegistry {
    owner: Address,
    instance: u64,
    configs: BTreeMap<PoolId, PoolConfig>,
    events: Vec<RegistryEvent>,
}

impl PoolConfigRegistry {
    /// Creates an empty registry owned by `owner` and its write capability.
    #[must_use]
    pub fn new(owner: Address) -> (Self, Registrar) {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        let registry = Self {
            owner,
            instance,
            configs: BTreeMap::new(),
            events: Vec::new(),
        };
        (
            registry,
            Registrar {
                registry: owner,
                instance,
            },
        )
    }

    /// Address the registry is bound to.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    fn authorize(&self, registrar: &Registrar) -> crate::error::Result<()> {
        if registrar.registry != self.owner || registrar.instance != self.instance {
            return Err(CascadeError::Unauthorized);
        }
        Ok(())
    }

    fn ensure_vacant(&self, id: PoolId) -> crate::error::Result<()> {
        if self.configs.contains_key(&id) {
            return Err(CascadeError::AlreadyRegistered(id));
        }
        Ok(())
    }

    fn store(&mut self, id: PoolId, config: PoolConfig) -> PoolConfig {
        self.configs.insert(id, config);
        self.events.push(RegistryEvent::PoolRegistered {
            pool_id: id,
            parent_pool_id: config.parent_pool_id(),
            shared_asset: config.shared_asset(),
        });
        config
    }

    /// Registers a root pool pairing `parent_asset` with the native asset.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Unauthorized`] for a foreign capability.
    /// - [`CascadeError::AlreadyRegistered`] if the pool has a config.
    /// - [`CascadeError::Validation`] if the key does not pair
    ///   `parent_asset` with the native asset.
    pub fn register_root(
        &mut self,
        registrar: &Registrar,
        parent_asset: AssetId,
        key: &PoolKey,
    ) -> crate::error::Result<PoolConfig> {
        self.authorize(registrar)?;
        let id = key.id();
        self.ensure_vacant(id)?;
        if parent_asset.is_native() || !key.contains(AssetId::NATIVE) {
            return Err(CascadeError::Validation(
                "root pool must pair the parent asset with the native asset",
            ));
        }
        let Some(side) = key.side_of(parent_asset) else {
            return Err(CascadeError::Validation(
                "root pool must pair the parent asset with the native asset",
            ));
        };
        info!(pool = %id, parent_asset = %parent_asset, "registered root pool");
        Ok(self.store(id, PoolConfig::root(side, parent_asset)))
    }

    /// Registers a child pool under the root pool `parent_key`.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Unauthorized`] for a foreign capability.
    /// - [`CascadeError::AlreadyRegistered`] if the pool has a config.
    /// - [`CascadeError::NotConfigured`] if `parent_key` is not a registered
    ///   root pool.
    /// - [`CascadeError::Validation`] if the child key does not contain the
    ///   parent's shared asset.
    pub fn register_child(
        &mut self,
        registrar: &Registrar,
        key: &PoolKey,
        parent_key: &PoolKey,
    ) -> crate::error::Result<PoolConfig> {
        self.authorize(registrar)?;
        let id = key.id();
        self.ensure_vacant(id)?;
        let parent_id = parent_key.id();
        let parent = self
            .configs
            .get(&parent_id)
            .filter(|c| !c.has_parent())
            .ok_or(CascadeError::NotConfigured(parent_id))?;
        let shared = parent.shared_asset();
        let Some(local_side) = key.side_of(shared) else {
            return Err(CascadeError::Validation(
                "child pool must contain the parent's shared asset",
            ));
        };
        let config = PoolConfig::child(local_side, parent.local_shared_side(), *parent_key, shared);
        info!(pool = %id, parent = %parent_id, shared_asset = %shared, "registered child pool");
        Ok(self.store(id, config))
    }

    /// Config of a registered pool.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotFound`] for an unknown pool.
    pub fn get(&self, id: PoolId) -> crate::error::Result<PoolConfig> {
        self.configs
            .get(&id)
            .copied()
            .ok_or(CascadeError::NotFound(id))
    }

    /// Returns `true` if `id` has a config.
    #[must_use]
    pub fn contains(&self, id: PoolId) -> bool {
        self.configs.contains_key(&id)
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Pending notifications, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Takes all pending notifications.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{FeeTier, TickSpacing, TokenSide};

    fn router() -> Address {
        Address::repeat_byte(0xee)
    }

    fn asset(byte: u8) -> AssetId {
        AssetId::new(Address::repeat_byte(byte))
    }

    fn key(x: AssetId, y: AssetId) -> PoolKey {
        let Ok(s) = TickSpacing::new(60) else {
            panic!("valid spacing");
        };
        let Ok(k) = PoolKey::new(x, y, FeeTier::TIER_0_30_PERCENT, s, router()) else {
            panic!("valid key");
        };
        k
    }

    fn setup() -> (PoolConfigRegistry, Registrar, PoolKey) {
        let (mut registry, registrar) = PoolConfigRegistry::new(router());
        let root = key(asset(0x50), AssetId::NATIVE);
        let Ok(_) = registry.register_root(&registrar, asset(0x50), &root) else {
            panic!("root registration");
        };
        (registry, registrar, root)
    }

    // -- Roots ---------------------------------------------------------------

    #[test]
    fn root_config() {
        let (registry, _, root) = setup();
        let Ok(config) = registry.get(root.id()) else {
            panic!("expected Ok");
        };
        assert!(config.initialized());
        assert!(!config.has_parent());
        assert!(config.parent_pool_key().is_none());
        assert_eq!(config.shared_asset(), asset(0x50));
        // Native is currency0, so the parent asset sits on side B.
        assert!(!config.shared_is_local_side_a());
        assert_eq!(config.local_shared_side(), TokenSide::B);
    }

    #[test]
    fn root_registered_twice_rejected() {
        let (mut registry, registrar, root) = setup();
        let r = registry.register_root(&registrar, asset(0x50), &root);
        assert_eq!(r, Err(CascadeError::AlreadyRegistered(root.id())));
    }

    #[test]
    fn root_without_native_rejected() {
        let (mut registry, registrar) = PoolConfigRegistry::new(router());
        let r = registry.register_root(&registrar, asset(1), &key(asset(1), asset(2)));
        assert!(matches!(r, Err(CascadeError::Validation(_))));
        let r = registry.register_root(&registrar, asset(3), &key(asset(1), AssetId::NATIVE));
        assert!(matches!(r, Err(CascadeError::Validation(_))));
        assert!(registry.is_empty());
    }

    // -- Children ------------------------------------------------------------

    #[test]
    fn child_config_tracks_sides() {
        let (mut registry, registrar, root) = setup();
        let child = key(asset(0x10), asset(0x50));
        let Ok(config) = registry.register_child(&registrar, &child, &root) else {
            panic!("expected Ok");
        };
        assert!(config.has_parent());
        assert_eq!(config.parent_pool_id(), Some(root.id()));
        assert_eq!(config.shared_asset(), asset(0x50));
        assert!(!config.shared_is_local_side_a());
        assert!(!config.shared_is_parent_side_a());

        let other = key(asset(0x90), asset(0x50));
        let Ok(config) = registry.register_child(&registrar, &other, &root) else {
            panic!("expected Ok");
        };
        assert!(config.shared_is_local_side_a());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn child_of_unregistered_parent_rejected() {
        let (mut registry, registrar) = PoolConfigRegistry::new(router());
        let root = key(asset(0x50), AssetId::NATIVE);
        let r = registry.register_child(&registrar, &key(asset(1), asset(0x50)), &root);
        assert_eq!(r, Err(CascadeError::NotConfigured(root.id())));
    }

    #[test]
    fn grandchild_rejected() {
        let (mut registry, registrar, root) = setup();
        let child = key(asset(0x10), asset(0x50));
        let Ok(_) = registry.register_child(&registrar, &child, &root) else {
            panic!("expected Ok");
        };
        let grandchild = key(asset(0x11), asset(0x10));
        let r = registry.register_child(&registrar, &grandchild, &child);
        assert_eq!(r, Err(CascadeError::NotConfigured(child.id())));
    }

    #[test]
    fn child_missing_shared_asset_rejected() {
        let (mut registry, registrar, root) = setup();
        let r = registry.register_child(&registrar, &key(asset(1), asset(2)), &root);
        assert!(matches!(r, Err(CascadeError::Validation(_))));
    }

    #[test]
    fn child_registered_twice_rejected() {
        let (mut registry, registrar, root) = setup();
        let child = key(asset(0x10), asset(0x50));
        let Ok(_) = registry.register_child(&registrar, &child, &root) else {
            panic!("expected Ok");
        };
        let r = registry.register_child(&registrar, &child, &root);
        assert_eq!(r, Err(CascadeError::AlreadyRegistered(child.id())));
    }

    // -- Access --------------------------------------------------------------

    #[test]
    fn foreign_registrar_rejected() {
        let (mut registry, _) = PoolConfigRegistry::new(router());
        let (_, foreign) = PoolConfigRegistry::new(Address::repeat_byte(0x01));
        let root = key(asset(0x50), AssetId::NATIVE);
        let r = registry.register_root(&foreign, asset(0x50), &root);
        assert_eq!(r, Err(CascadeError::Unauthorized));
    }

    #[test]
    fn registrar_of_same_address_registry_rejected() {
        let (mut registry, registrar) = PoolConfigRegistry::new(router());
        let (_, lookalike) = PoolConfigRegistry::new(router());
        assert_eq!(lookalike.registry(), registrar.registry());
        let root = key(asset(0x50), AssetId::NATIVE);
        let r = registry.register_root(&lookalike, asset(0x50), &root);
        assert_eq!(r, Err(CascadeError::Unauthorized));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicated_registrar_writes_to_cloned_registry() {
        let (registry, registrar) = PoolConfigRegistry::new(router());
        let mut draft = registry.clone();
        let copy = registrar.duplicate();
        let root = key(asset(0x50), AssetId::NATIVE);
        assert!(draft.register_root(&copy, asset(0x50), &root).is_ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_pool_not_found() {
        let (registry, _) = PoolConfigRegistry::new(router());
        let id = key(asset(1), asset(2)).id();
        assert_eq!(registry.get(id), Err(CascadeError::NotFound(id)));
    }

    #[test]
    fn events_drained_in_order() {
        let (mut registry, registrar, root) = setup();
        let child = key(asset(0x10), asset(0x50));
        let Ok(_) = registry.register_child(&registrar, &child, &root) else {
            panic!("expected Ok");
        };
        let events = registry.drain_events();
        assert_eq!(
            events,
            vec![
                RegistryEvent::PoolRegistered {
                    pool_id: root.id(),
                    parent_pool_id: None,
                    shared_asset: asset(0x50),
                },
                RegistryEvent::PoolRegistered {
                    pool_id: child.id(),
                    parent_pool_id: Some(root.id()),
                    shared_asset: asset(0x50),
                },
            ]
        );
        assert!(registry.events().is_empty());
    }
}
