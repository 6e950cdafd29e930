//! Unified error types for the cascade-amm library.
//!
//! All fallible operations across the crate return [`CascadeError`] as their
//! error type. Any error aborts the enclosing atomic unit: nothing in this
//! crate retries or recovers locally.

use thiserror::Error;

use crate::domain::{Account, Amount, AssetId, PoolId};

/// Crate-wide error enum.
///
/// Variants fall into the families described on [`CascadeError::is_validation`],
/// registry consistency (`AlreadyRegistered`, `NotConfigured`, `NotFound`),
/// bounded search (`SaltSearchExhausted`), external calls
/// (`EngineCallFailure`, `InsufficientBalance`) and defects
/// (`AccountingInvariantViolation`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CascadeError {
    /// Bad caller input, rejected before any state change.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// Tick index outside the supported range or misaligned.
    #[error("invalid tick: {0}")]
    InvalidTick(&'static str),

    /// Tick range with `lower >= upper` or misaligned bounds.
    #[error("invalid tick range: {0}")]
    InvalidTickRange(&'static str),

    /// Price that is negative, non-finite or outside the sqrt-price domain.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// Fee rate outside `0..=10_000` basis points or an unsupported tier.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Configuration rejected by validation or by the TOML parser.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configuration already exists for this pool.
    #[error("pool {0} is already registered")]
    AlreadyRegistered(PoolId),

    /// The pool (or its parent) has no usable configuration.
    #[error("pool {0} is not configured")]
    NotConfigured(PoolId),

    /// Lookup of an unknown pool.
    #[error("pool {0} not found")]
    NotFound(PoolId),

    /// The salt search hit its iteration cap without a match.
    #[error("salt search exhausted after {attempts} attempts")]
    SaltSearchExhausted {
        /// Number of candidate salts examined.
        attempts: u64,
    },

    /// The computed protocol fee is larger than the trade notional.
    #[error("protocol fee {fee} exceeds trade notional {notional}")]
    CapExceeded {
        /// Total protocol fee.
        fee: Amount,
        /// Notional of the fee-bearing trade leg.
        notional: Amount,
    },

    /// The execution engine (or vault factory) rejected a call.
    #[error("execution engine rejected call: {0}")]
    EngineCallFailure(String),

    /// A postcondition on balances or fee accounting did not hold.
    #[error("accounting invariant violated: {0}")]
    AccountingInvariantViolation(String),

    /// The caller does not hold the capability required for this call.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// A ledger transfer exceeded the holder's balance.
    #[error("insufficient balance of {asset} held by {holder}")]
    InsufficientBalance {
        /// Asset being moved.
        asset: AssetId,
        /// Account that lacked funds.
        holder: Account,
    },

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl CascadeError {
    /// Returns `true` for caller-correctable input errors.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidTick(_)
                | Self::InvalidTickRange(_)
                | Self::InvalidPrice(_)
                | Self::InvalidFee(_)
                | Self::InvalidConfiguration(_)
        )
    }

    /// Returns `true` for registry consistency violations, which are
    /// permanent for the identifier involved.
    #[must_use]
    pub const fn is_registry_violation(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRegistered(_) | Self::NotConfigured(_) | Self::NotFound(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CascadeError>;
