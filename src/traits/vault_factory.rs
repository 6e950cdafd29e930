//! Deployment interface of the NFT fractionalization vault factory.
//!
//! A vault turns the NFTs of one collection into a fungible asset. The
//! factory deploys vaults and collections at deterministic (CREATE2-style)
//! addresses, so their identifiers can be predicted from a salt before
//! deployment.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use super::AssetLedger;
use crate::domain::{Account, Amount, AssetId, CollectionId};

/// Descriptive metadata of a newly deployed NFT collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Human-readable name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Base URI for token metadata.
    pub base_uri: String,
}

/// Roles assigned to a freshly deployed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionRoles {
    /// Owner of the collection contract.
    pub owner: Account,
    /// Account allowed to mint NFTs.
    pub minter: Account,
}

/// Vault and collection deployer.
pub trait VaultFactory {
    /// Address the factory deploys from.
    #[must_use]
    fn address(&self) -> Address;

    /// Identifier a plain vault for `collection` would receive.
    #[must_use]
    fn predict_vault(&self, collection: CollectionId) -> AssetId;

    /// Identifier a collection deployed at `salt` would receive.
    #[must_use]
    fn predict_collection(&self, salt: B256) -> CollectionId;

    /// Identifier a pre-minted derivative vault deployed at `salt` would
    /// receive.
    #[must_use]
    fn predict_derivative_vault(&self, salt: B256) -> AssetId;

    /// Deploys a plain vault for an existing collection.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Validation`](crate::error::CascadeError::Validation)
    /// if the collection already has a vault.
    fn deploy_vault(&mut self, collection: CollectionId) -> crate::error::Result<AssetId>;

    /// Deploys a new NFT collection at `salt`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::EngineCallFailure`](crate::error::CascadeError::EngineCallFailure)
    /// if the salt was already used.
    fn deploy_collection(
        &mut self,
        metadata: &CollectionMetadata,
        roles: CollectionRoles,
        salt: B256,
    ) -> crate::error::Result<CollectionId>;

    /// Deploys a vault for `collection` at `salt` and mints `max_supply` of
    /// its asset to `holder`.
    ///
    /// # Errors
    ///
    /// Fails if the salt was already used, the collection already has a
    /// vault, or minting overflows.
    fn deploy_derivative_vault(
        &mut self,
        ledger: &mut dyn AssetLedger,
        collection: CollectionId,
        salt: B256,
        max_supply: Amount,
        holder: Account,
    ) -> crate::error::Result<AssetId>;

    /// Vault asset of `collection`, if one was deployed.
    #[must_use]
    fn vault_for(&self, collection: CollectionId) -> Option<AssetId>;

    /// Returns `true` if `asset` was deployed by this factory.
    #[must_use]
    fn is_vault(&self, asset: AssetId) -> bool;

    /// Returns `true` if `collection` was deployed by this factory.
    #[must_use]
    fn is_collection(&self, collection: CollectionId) -> bool;
}
