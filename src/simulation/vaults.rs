//! In-memory vault factory with CREATE2 address prediction.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{keccak256, Address, B256};

use crate::domain::{Account, Amount, AssetId, CollectionId};
use crate::error::CascadeError;
use crate::miner::{Create2Oracle, IdentifierOracle};
use crate::traits::{AssetLedger, CollectionMetadata, CollectionRoles, VaultFactory};

/// A collection deployed through the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedCollection {
    /// Metadata supplied at deployment.
    pub metadata: CollectionMetadata,
    /// Owner and minter.
    pub roles: CollectionRoles,
}

/// Vault factory that derives every address with CREATE2 from its own
/// address and a per-contract-kind init code hash.
#[derive(Debug, Clone)]
pub struct InMemoryVaultFactory {
    collections_oracle: Create2Oracle,
    vaults_oracle: Create2Oracle,
    derivatives_oracle: Create2Oracle,
    address: Address,
    collections: BTreeMap<CollectionId, DeployedCollection>,
    vaults: BTreeMap<CollectionId, AssetId>,
    assets: BTreeSet<AssetId>,
}

impl InMemoryVaultFactory {
    /// Creates a factory deploying from `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            collections_oracle: Create2Oracle::new(address, keccak256(b"cascade.collection")),
            vaults_oracle: Create2Oracle::new(address, keccak256(b"cascade.vault")),
            derivatives_oracle: Create2Oracle::new(address, keccak256(b"cascade.derivative-vault")),
            address,
            collections: BTreeMap::new(),
            vaults: BTreeMap::new(),
            assets: BTreeSet::new(),
        }
    }

    /// Collection deployed through this factory.
    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&DeployedCollection> {
        self.collections.get(&id)
    }

    fn vault_salt(collection: CollectionId) -> B256 {
        keccak256(collection.address())
    }
}

impl VaultFactory for InMemoryVaultFactory {
    fn address(&self) -> Address {
        self.address
    }

    fn predict_vault(&self, collection: CollectionId) -> AssetId {
        self.vaults_oracle.predict(Self::vault_salt(collection))
    }

    fn predict_collection(&self, salt: B256) -> CollectionId {
        CollectionId::new(self.collections_oracle.predict(salt).address())
    }

    fn predict_derivative_vault(&self, salt: B256) -> AssetId {
        self.derivatives_oracle.predict(salt)
    }

    fn deploy_vault(&mut self, collection: CollectionId) -> crate::error::Result<AssetId> {
        if self.vaults.contains_key(&collection) {
            return Err(CascadeError::Validation("collection already has a vault"));
        }
        let asset = self.predict_vault(collection);
        self.vaults.insert(collection, asset);
        self.assets.insert(asset);
        Ok(asset)
    }

    fn deploy_collection(
        &mut self,
        metadata: &CollectionMetadata,
        roles: CollectionRoles,
        salt: B256,
    ) -> crate::error::Result<CollectionId> {
        let id = self.predict_collection(salt);
        if self.collections.contains_key(&id) {
            return Err(CascadeError::EngineCallFailure(format!(
                "collection address {} already deployed",
                id.address()
            )));
        }
        self.collections.insert(
            id,
            DeployedCollection {
                metadata: metadata.clone(),
                roles,
            },
        );
        Ok(id)
    }

    fn deploy_derivative_vault(
        &mut self,
        ledger: &mut dyn AssetLedger,
        collection: CollectionId,
        salt: B256,
        max_supply: Amount,
        holder: Account,
    ) -> crate::error::Result<AssetId> {
        if self.vaults.contains_key(&collection) {
            return Err(CascadeError::Validation("collection already has a vault"));
        }
        let asset = self.predict_derivative_vault(salt);
        if self.assets.contains(&asset) {
            return Err(CascadeError::EngineCallFailure(format!(
                "vault address {asset} already deployed"
            )));
        }
        ledger.mint(asset, holder, max_supply)?;
        self.vaults.insert(collection, asset);
        self.assets.insert(asset);
        Ok(asset)
    }

    fn vault_for(&self, collection: CollectionId) -> Option<AssetId> {
        self.vaults.get(&collection).copied()
    }

    fn is_vault(&self, asset: AssetId) -> bool {
        self.assets.contains(&asset)
    }

    fn is_collection(&self, collection: CollectionId) -> bool {
        self.collections.contains_key(&collection)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::simulation::InMemoryLedger;

    fn factory() -> InMemoryVaultFactory {
        InMemoryVaultFactory::new(Address::repeat_byte(0xfa))
    }

    fn roles() -> CollectionRoles {
        CollectionRoles {
            owner: Address::repeat_byte(1),
            minter: Address::repeat_byte(2),
        }
    }

    #[test]
    fn deployments_match_predictions() {
        let mut vaults = factory();
        let mut ledger = InMemoryLedger::new();
        let salt = B256::repeat_byte(5);
        let predicted = vaults.predict_collection(salt);
        let Ok(collection) = vaults.deploy_collection(&CollectionMetadata::default(), roles(), salt)
        else {
            panic!("expected Ok");
        };
        assert_eq!(collection, predicted);

        let predicted = vaults.predict_derivative_vault(salt);
        let holder = Address::repeat_byte(3);
        let Ok(asset) =
            vaults.deploy_derivative_vault(&mut ledger, collection, salt, Amount::new(50), holder)
        else {
            panic!("expected Ok");
        };
        assert_eq!(asset, predicted);
        assert_eq!(ledger.balance_of(asset, holder), Amount::new(50));
        assert_eq!(vaults.vault_for(collection), Some(asset));
        assert!(vaults.is_vault(asset));
        assert!(vaults.is_collection(collection));
        assert!(!vaults.is_collection(vaults.predict_collection(B256::repeat_byte(6))));
    }

    #[test]
    fn salt_reuse_rejected() {
        let mut vaults = factory();
        let salt = B256::repeat_byte(5);
        let Ok(_) = vaults.deploy_collection(&CollectionMetadata::default(), roles(), salt) else {
            panic!("expected Ok");
        };
        assert!(matches!(
            vaults.deploy_collection(&CollectionMetadata::default(), roles(), salt),
            Err(CascadeError::EngineCallFailure(_))
        ));
    }

    #[test]
    fn one_vault_per_collection() {
        let mut vaults = factory();
        let collection = CollectionId::new(Address::repeat_byte(0xc0));
        let Ok(asset) = vaults.deploy_vault(collection) else {
            panic!("expected Ok");
        };
        assert_eq!(asset, vaults.predict_vault(collection));
        assert!(vaults.deploy_vault(collection).is_err());
    }

    #[test]
    fn contract_kinds_do_not_collide() {
        let vaults = factory();
        let salt = B256::repeat_byte(9);
        assert_ne!(
            vaults.predict_collection(salt).address(),
            vaults.predict_derivative_vault(salt).address()
        );
    }
}
