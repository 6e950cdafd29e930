//! Deterministic salt search for token ordering.
//!
//! A derivative asset's identifier is fixed by the salt it is deployed with.
//! Pool keys order their currencies by identifier, so choosing the salt
//! chooses which side of the parent asset the derivative lands on.
//! [`TokenOrderingMiner`] walks a deterministic salt sequence derived from a
//! caller hint until the predicted identifier falls on the requested side
//! and the oracle reports it free.

use alloy_primitives::{keccak256, Address, B256};
use tracing::debug;

use crate::domain::{AssetId, TokenSide};
use crate::error::CascadeError;

/// Predicts the identifier a deployment at `salt` would receive.
pub trait IdentifierOracle {
    /// Identifier for `salt`.
    fn predict(&self, salt: B256) -> AssetId;

    /// Returns `false` if a deployment at `salt` would collide with an
    /// existing one.
    fn available(&self, _salt: B256, _asset: AssetId) -> bool {
        true
    }
}

impl<F> IdentifierOracle for F
where
    F: Fn(B256) -> AssetId,
{
    fn predict(&self, salt: B256) -> AssetId {
        self(salt)
    }
}

/// CREATE2 address prediction for a fixed deployer and init code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Create2Oracle {
    deployer: Address,
    init_code_hash: B256,
}

impl Create2Oracle {
    /// Creates an oracle for contracts deployed by `deployer` from init code
    /// hashing to `init_code_hash`.
    #[must_use]
    pub const fn new(deployer: Address, init_code_hash: B256) -> Self {
        Self {
            deployer,
            init_code_hash,
        }
    }
}

impl IdentifierOracle for Create2Oracle {
    fn predict(&self, salt: B256) -> AssetId {
        AssetId::new(self.deployer.create2(salt.0, self.init_code_hash.0))
    }
}

/// A salt whose predicted identifier satisfies the ordering constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinedSalt {
    /// Salt to deploy with.
    pub salt: B256,
    /// Identifier the deployment will receive.
    pub asset: AssetId,
    /// Candidates tried, including the winning one.
    pub attempts: u64,
}

/// Bounded search for an ordering-compatible salt.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{Address, B256};
/// use cascade_amm::domain::{AssetId, TokenSide};
/// use cascade_amm::miner::{Create2Oracle, TokenOrderingMiner};
///
/// let oracle = Create2Oracle::new(Address::repeat_byte(0x11), B256::repeat_byte(0x22));
/// let parent = AssetId::new(Address::repeat_byte(0x80));
/// let miner = TokenOrderingMiner::new(1_000);
/// let mined = miner.mine(&oracle, B256::ZERO, parent, TokenSide::A).expect("found");
/// assert!(mined.asset < parent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOrderingMiner {
    max_iterations: u64,
}

impl TokenOrderingMiner {
    /// Creates a miner that gives up after `max_iterations` candidates.
    #[must_use]
    pub const fn new(max_iterations: u64) -> Self {
        Self { max_iterations }
    }

    /// Iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// The `index`-th candidate salt for `hint`: `keccak256(hint ‖ index)`.
    #[must_use]
    pub fn candidate_salt(hint: B256, index: u64) -> B256 {
        let mut preimage = [0u8; 40];
        preimage[..32].copy_from_slice(hint.as_slice());
        preimage[32..].copy_from_slice(&index.to_be_bytes());
        keccak256(preimage)
    }

    /// Returns `true` if `candidate` sits on `side` relative to `counterpart`.
    #[must_use]
    pub fn satisfies(candidate: AssetId, counterpart: AssetId, side: TokenSide) -> bool {
        match side {
            TokenSide::A => candidate < counterpart,
            TokenSide::B => candidate > counterpart,
        }
    }

    /// Finds the first candidate salt placing the predicted identifier on
    /// `side` of `counterpart`.
    ///
    /// Candidates the oracle reports unavailable are skipped. The search is
    /// deterministic: the same oracle state, hint and constraint always
    /// yield the same salt.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::Validation`] if side A of the native asset is
    ///   requested (nothing orders below it).
    /// - [`CascadeError::SaltSearchExhausted`] if no candidate within the
    ///   iteration cap qualifies.
    pub fn mine(
        &self,
        oracle: &dyn IdentifierOracle,
        hint: B256,
        counterpart: AssetId,
        side: TokenSide,
    ) -> crate::error::Result<MinedSalt> {
        if side == TokenSide::A && counterpart.is_native() {
            return Err(CascadeError::Validation(
                "no identifier orders below the native asset",
            ));
        }
        for index in 0..self.max_iterations {
            let salt = Self::candidate_salt(hint, index);
            let asset = oracle.predict(salt);
            if Self::satisfies(asset, counterpart, side) && oracle.available(salt, asset) {
                let attempts = index + 1;
                debug!(%salt, %asset, attempts, "mined salt");
                return Ok(MinedSalt {
                    salt,
                    asset,
                    attempts,
                });
            }
        }
        Err(CascadeError::SaltSearchExhausted {
            attempts: self.max_iterations,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn asset(byte: u8) -> AssetId {
        AssetId::new(Address::repeat_byte(byte))
    }

    fn oracle() -> Create2Oracle {
        Create2Oracle::new(Address::repeat_byte(0x11), B256::repeat_byte(0x22))
    }

    #[test]
    fn finds_both_sides() {
        let miner = TokenOrderingMiner::new(1_000);
        let parent = asset(0x80);
        let Ok(below) = miner.mine(&oracle(), B256::ZERO, parent, TokenSide::A) else {
            panic!("expected Ok");
        };
        let Ok(above) = miner.mine(&oracle(), B256::ZERO, parent, TokenSide::B) else {
            panic!("expected Ok");
        };
        assert!(below.asset < parent);
        assert!(above.asset > parent);
        assert_eq!(oracle().predict(below.salt), below.asset);
    }

    #[test]
    fn deterministic() {
        let miner = TokenOrderingMiner::new(1_000);
        let hint = B256::repeat_byte(7);
        let a = miner.mine(&oracle(), hint, asset(0x40), TokenSide::B);
        let b = miner.mine(&oracle(), hint, asset(0x40), TokenSide::B);
        assert_eq!(a, b);
    }

    #[test]
    fn first_candidate_is_index_zero() {
        let miner = TokenOrderingMiner::new(10);
        let Ok(mined) = miner.mine(&|_: B256| asset(0x01), B256::ZERO, asset(0x02), TokenSide::A) else {
            panic!("expected Ok");
        };
        assert_eq!(mined.attempts, 1);
        assert_eq!(mined.salt, TokenOrderingMiner::candidate_salt(B256::ZERO, 0));
    }

    #[test]
    fn skips_until_constraint_holds() {
        let target = TokenOrderingMiner::candidate_salt(B256::ZERO, 3);
        let closure = move |salt: B256| if salt == target { asset(0x01) } else { asset(0xff) };
        let miner = TokenOrderingMiner::new(10);
        let Ok(mined) = miner.mine(&closure, B256::ZERO, asset(0x80), TokenSide::A) else {
            panic!("expected Ok");
        };
        assert_eq!(mined.attempts, 4);
        assert_eq!(mined.salt, target);
    }

    /// Oracle that treats the first candidate of every hint as deployed.
    struct FirstTaken;

    impl IdentifierOracle for FirstTaken {
        fn predict(&self, _salt: B256) -> AssetId {
            asset(0x01)
        }

        fn available(&self, salt: B256, _asset: AssetId) -> bool {
            salt != TokenOrderingMiner::candidate_salt(B256::ZERO, 0)
        }
    }

    #[test]
    fn skips_unavailable_candidates() {
        let miner = TokenOrderingMiner::new(10);
        let Ok(mined) = miner.mine(&FirstTaken, B256::ZERO, asset(0x80), TokenSide::A) else {
            panic!("expected Ok");
        };
        assert_eq!(mined.attempts, 2);
        assert_eq!(mined.salt, TokenOrderingMiner::candidate_salt(B256::ZERO, 1));
    }

    #[test]
    fn exhausts_after_cap() {
        let miner = TokenOrderingMiner::new(25);
        let r = miner.mine(&|_: B256| asset(0xff), B256::ZERO, asset(0x80), TokenSide::A);
        assert_eq!(r, Err(CascadeError::SaltSearchExhausted { attempts: 25 }));
    }

    #[test]
    fn below_native_is_impossible() {
        let miner = TokenOrderingMiner::new(25);
        let r = miner.mine(&oracle(), B256::ZERO, AssetId::NATIVE, TokenSide::A);
        assert!(matches!(r, Err(CascadeError::Validation(_))));
    }

    #[test]
    fn candidate_salts_differ() {
        let a = TokenOrderingMiner::candidate_salt(B256::ZERO, 0);
        let b = TokenOrderingMiner::candidate_salt(B256::ZERO, 1);
        let c = TokenOrderingMiner::candidate_salt(B256::repeat_byte(1), 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
