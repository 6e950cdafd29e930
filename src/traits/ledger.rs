//! Fungible balance bookkeeping shared by every collaborator.

use crate::domain::{Account, Amount, AssetId};

/// Balances of fungible assets per holder.
///
/// The native asset ([`AssetId::NATIVE`]) is tracked like any other asset.
pub trait AssetLedger {
    /// Balance of `asset` held by `holder`.
    #[must_use]
    fn balance_of(&self, asset: AssetId, holder: Account) -> Amount;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InsufficientBalance`] if `from` holds less than
    ///   `amount`.
    /// - [`CascadeError::Overflow`] if the recipient balance overflows.
    ///
    /// [`CascadeError::InsufficientBalance`]: crate::error::CascadeError::InsufficientBalance
    /// [`CascadeError::Overflow`]: crate::error::CascadeError::Overflow
    fn transfer(
        &mut self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> crate::error::Result<()>;

    /// Creates `amount` of `asset` in `to`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Overflow`](crate::error::CascadeError::Overflow)
    /// if the balance overflows.
    fn mint(&mut self, asset: AssetId, to: Account, amount: Amount) -> crate::error::Result<()>;
}
