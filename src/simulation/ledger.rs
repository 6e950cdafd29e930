//! In-memory asset ledger.

use std::collections::BTreeMap;

use crate::domain::{Account, Amount, AssetId};
use crate::error::CascadeError;
use crate::traits::AssetLedger;

/// Balances keyed by `(asset, holder)`.
///
/// Zero balances are removed so two ledgers with the same non-zero
/// balances compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: BTreeMap<(AssetId, Account), Amount>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total supply of `asset` across all holders.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .fold(Amount::ZERO, |acc, (_, v)| {
                acc.checked_add(v).unwrap_or(Amount::MAX)
            })
    }

    fn set(&mut self, asset: AssetId, holder: Account, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(asset, holder));
        } else {
            self.balances.insert((asset, holder), amount);
        }
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: AssetId, holder: Account) -> Amount {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> crate::error::Result<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let from_balance = self
            .balance_of(asset, from)
            .checked_sub(&amount)
            .ok_or(CascadeError::InsufficientBalance {
                asset,
                holder: from,
            })?;
        let to_balance = self
            .balance_of(asset, to)
            .try_add(&amount, "recipient balance")?;
        self.set(asset, from, from_balance);
        self.set(asset, to, to_balance);
        Ok(())
    }

    fn mint(&mut self, asset: AssetId, to: Account, amount: Amount) -> crate::error::Result<()> {
        let balance = self.balance_of(asset, to).try_add(&amount, "minted balance")?;
        self.set(asset, to, balance);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    fn token() -> AssetId {
        AssetId::new(Address::repeat_byte(0x70))
    }

    #[test]
    fn mint_and_transfer() {
        let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
        let mut ledger = InMemoryLedger::new();
        assert_eq!(ledger.mint(token(), a, Amount::new(100)), Ok(()));
        assert_eq!(ledger.transfer(token(), a, b, Amount::new(40)), Ok(()));
        assert_eq!(ledger.balance_of(token(), a), Amount::new(60));
        assert_eq!(ledger.balance_of(token(), b), Amount::new(40));
        assert_eq!(ledger.total_supply(token()), Amount::new(100));
    }

    #[test]
    fn overdraft_rejected_without_change() {
        let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
        let mut ledger = InMemoryLedger::new();
        let Ok(()) = ledger.mint(token(), a, Amount::new(10)) else {
            panic!("mint");
        };
        let before = ledger.clone();
        assert_eq!(
            ledger.transfer(token(), a, b, Amount::new(11)),
            Err(CascadeError::InsufficientBalance {
                asset: token(),
                holder: a,
            })
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn emptied_balances_are_pruned() {
        let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
        let mut ledger = InMemoryLedger::new();
        let Ok(()) = ledger.mint(token(), a, Amount::new(10)) else {
            panic!("mint");
        };
        let Ok(()) = ledger.transfer(token(), a, b, Amount::new(10)) else {
            panic!("transfer");
        };
        let mut expected = InMemoryLedger::new();
        let Ok(()) = expected.mint(token(), b, Amount::new(10)) else {
            panic!("mint");
        };
        assert_eq!(ledger, expected);
    }
}
