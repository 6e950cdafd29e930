//! Inputs and outputs of derivative provisioning.

use alloy_primitives::B256;

use crate::domain::{
    Account, Amount, AssetId, CollectionId, FeeTier, Liquidity, PoolId, PoolKey, SqrtPriceX96,
    Tick, TickSpacing, TokenSide,
};
use crate::error::CascadeError;
use crate::traits::{CollectionMetadata, CollectionRoles};

/// Everything needed to provision one derivative asset and its pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativeParams {
    /// Fungible asset the derivative pool pairs against.
    pub parent_asset: AssetId,
    /// Metadata of the new NFT collection.
    pub metadata: CollectionMetadata,
    /// Fee tier of the child pool.
    pub fee: FeeTier,
    /// Tick spacing of the child pool.
    pub tick_spacing: TickSpacing,
    /// Initial price of the child pool.
    pub sqrt_price: SqrtPriceX96,
    /// Lower bound of the seeded position.
    pub tick_lower: Tick,
    /// Upper bound of the seeded position.
    pub tick_upper: Tick,
    /// Liquidity of the seeded position.
    pub liquidity: Liquidity,
    /// Parent asset the caller puts up for the seeded position.
    pub parent_contribution: Amount,
    /// Derivative supply minted at deployment.
    pub max_supply: Amount,
    /// Owner of the new collection.
    pub nft_owner: Account,
    /// Minter of the new collection.
    pub nft_minter: Account,
    /// Receives the derivative supply not used as liquidity.
    pub derivative_recipient: Account,
    /// Receives the unused part of the contribution.
    pub parent_refund_recipient: Account,
    /// Seed of the salt search.
    pub salt_hint: B256,
    /// Side of the child pool the derivative asset must land on.
    pub derivative_side: TokenSide,
}

impl DerivativeParams {
    /// Owner and minter roles of the new collection.
    #[must_use]
    pub const fn roles(&self) -> CollectionRoles {
        CollectionRoles {
            owner: self.nft_owner,
            minter: self.nft_minter,
        }
    }

    /// Checks the parameters for internal consistency.
    ///
    /// Whether the fee tier is supported and the parent has a root pool
    /// depends on protocol state and is checked by the orchestrator.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Validation`] for zero supply or liquidity, a native
    ///   parent asset, or a zero account.
    /// - [`CascadeError::InvalidTickRange`] if the range is empty or its
    ///   bounds are not multiples of the tick spacing.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_supply.is_zero() {
            return Err(CascadeError::Validation("max supply must be non-zero"));
        }
        if self.liquidity.is_zero() {
            return Err(CascadeError::Validation("liquidity must be non-zero"));
        }
        if self.parent_asset.is_native() {
            return Err(CascadeError::Validation(
                "parent asset must not be the native asset",
            ));
        }
        if self.tick_lower >= self.tick_upper {
            return Err(CascadeError::InvalidTickRange(
                "lower tick must be below upper tick",
            ));
        }
        if !self.tick_lower.is_aligned(self.tick_spacing)
            || !self.tick_upper.is_aligned(self.tick_spacing)
        {
            return Err(CascadeError::InvalidTickRange(
                "range bounds must be multiples of the tick spacing",
            ));
        }
        let accounts = [
            self.nft_owner,
            self.nft_minter,
            self.derivative_recipient,
            self.parent_refund_recipient,
        ];
        if accounts.iter().any(|a| *a == Account::ZERO) {
            return Err(CascadeError::Validation(
                "owner, minter and recipients must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Durable record of a provisioned derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivativeRecord {
    /// The derivative fungible asset.
    pub derivative_asset: AssetId,
    /// The derivative's NFT collection.
    pub collection: CollectionId,
    /// Asset the derivative pool pairs against.
    pub parent_asset: AssetId,
    /// Id of the child pool.
    pub child_pool_id: PoolId,
    /// Key of the child pool.
    pub child_key: PoolKey,
}

/// Notification and return value of a successful provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivativeCreated {
    /// The new collection.
    pub collection: CollectionId,
    /// The new derivative asset.
    pub asset: AssetId,
    /// Asset the derivative pool pairs against.
    pub parent_asset: AssetId,
    /// Id of the new child pool.
    pub child_pool_id: PoolId,
}
