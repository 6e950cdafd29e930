//! Points-weighted splitter for rewards collected into one account.
//!
//! The distributor holds a list of recipients with integer points. Each
//! distribution pays every recipient `floor(balance * points / total)` and
//! sends whatever is left (all of it when there are no recipients) to the
//! owner, so the distributor is always emptied.

use alloy_primitives::U256;
use tracing::info;

use crate::domain::{Account, Amount, AssetId, Rounding};
use crate::error::CascadeError;
use crate::math::{mul_div, to_u128};
use crate::traits::AssetLedger;

/// Notification emitted by a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionEvent {
    /// One payee's share (emitted for the owner even when zero).
    Distribution {
        /// Payee.
        recipient: Account,
        /// Amount paid.
        amount: Amount,
    },
    /// Sum paid out by one distribution.
    TotalDistribution {
        /// Amount distributed.
        amount: Amount,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Share {
    recipient: Account,
    points: u64,
}

/// Owner-controlled weighted reward splitter.
#[derive(Debug, Clone)]
pub struct FeeDistributor {
    account: Account,
    owner: Account,
    shares: Vec<Share>,
    total_points: u64,
    events: Vec<DistributionEvent>,
}

impl FeeDistributor {
    /// Creates a distributor holding funds at `account`, administered by
    /// and paying remainders to `owner`.
    #[must_use]
    pub const fn new(account: Account, owner: Account) -> Self {
        Self {
            account,
            owner,
            shares: Vec::new(),
            total_points: 0,
            events: Vec::new(),
        }
    }

    /// Account the distributor holds funds in.
    #[must_use]
    pub const fn account(&self) -> Account {
        self.account
    }

    /// Owner and remainder recipient.
    #[must_use]
    pub const fn owner(&self) -> Account {
        self.owner
    }

    /// Sum of all recipients' points.
    #[must_use]
    pub const fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Replaces the recipient list.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Unauthorized`] unless `caller` is the owner.
    /// - [`CascadeError::Validation`] on length mismatch, a zero recipient,
    ///   or all-zero points.
    /// - [`CascadeError::Overflow`] if the points sum overflows.
    pub fn set_fee_recipients(
        &mut self,
        caller: Account,
        recipients: &[Account],
        points: &[u64],
    ) -> crate::error::Result<()> {
        if caller != self.owner {
            return Err(CascadeError::Unauthorized);
        }
        if recipients.len() != points.len() {
            return Err(CascadeError::Validation(
                "recipients and points must have the same length",
            ));
        }
        if recipients.iter().any(|r| *r == Account::ZERO) {
            return Err(CascadeError::Validation("fee recipient must be non-zero"));
        }
        let total = points.iter().try_fold(0u64, |acc, p| acc.checked_add(*p));
        let Some(total_points) = total else {
            return Err(CascadeError::Overflow("fee recipient points"));
        };
        if !recipients.is_empty() && total_points == 0 {
            return Err(CascadeError::Validation(
                "fee recipients need a non-zero total of points",
            ));
        }
        self.shares = recipients
            .iter()
            .zip(points)
            .map(|(recipient, points)| Share {
                recipient: *recipient,
                points: *points,
            })
            .collect();
        self.total_points = total_points;
        Ok(())
    }

    /// Pulls `amount` of `asset` from `from` and distributes the balance.
    ///
    /// # Errors
    ///
    /// Fails if `from` cannot pay or a payout fails.
    pub fn pull_rewards(
        &mut self,
        ledger: &mut dyn AssetLedger,
        from: Account,
        asset: AssetId,
        amount: Amount,
    ) -> crate::error::Result<Amount> {
        ledger.transfer(asset, from, self.account, amount)?;
        self.distribute(ledger, asset)
    }

    /// Pays out the distributor's whole balance of `asset`.
    ///
    /// Returns the amount distributed; a zero balance is a no-op. Every
    /// share is computed before the first payout.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures.
    pub fn distribute(
        &mut self,
        ledger: &mut dyn AssetLedger,
        asset: AssetId,
    ) -> crate::error::Result<Amount> {
        let balance = ledger.balance_of(asset, self.account);
        if balance.is_zero() {
            return Ok(Amount::ZERO);
        }
        let total_points = U256::from(self.total_points);
        let mut payouts = Vec::with_capacity(self.shares.len() + 1);
        let mut paid = Amount::ZERO;
        for share in &self.shares {
            let amount = mul_div(
                U256::from(balance.get()),
                U256::from(share.points),
                total_points,
                Rounding::Down,
            )?;
            let amount = Amount::new(to_u128(amount, "distribution share")?);
            paid = paid.try_add(&amount, "distribution total")?;
            payouts.push((share.recipient, amount));
        }
        payouts.push((self.owner, balance.try_sub(&paid, "distribution remainder")?));

        for (recipient, amount) in &payouts {
            ledger.transfer(asset, self.account, *recipient, *amount)?;
        }
        self.events.extend(
            payouts
                .into_iter()
                .map(|(recipient, amount)| DistributionEvent::Distribution { recipient, amount }),
        );
        self.events
            .push(DistributionEvent::TotalDistribution { amount: balance });
        info!(%asset, amount = %balance, recipients = self.shares.len(), "distributed rewards");
        Ok(balance)
    }

    /// Pending notifications, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DistributionEvent] {
        &self.events
    }

    /// Takes all pending notifications.
    pub fn drain_events(&mut self) -> Vec<DistributionEvent> {
        std::mem::take(&mut self.events)
    }
}
