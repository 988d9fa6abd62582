use thiserror::Error;

use crate::asset::{AccountId, AssetError};

/// Canonical error type for treasury operations.
///
/// Every failure is synchronous and aborts the whole operation: there is no
/// partial allowance update and no partial fund movement behind any of these
/// variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    /// A non-owner invoked an owner-only operation.
    #[error("caller {caller} is not the treasury owner")]
    Unauthorized { caller: AccountId },

    /// Zero amount where a strictly positive delta is required.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The delegate is the reserved zero identity.
    #[error("spender cannot be the zero identity")]
    InvalidSpender,

    /// Ownership handover to the zero identity.
    #[error("owner cannot be the zero identity")]
    InvalidOwner,

    /// An allowance increase would exceed the representable range.
    #[error("allowance arithmetic overflow")]
    ArithmeticOverflow,

    /// An allowance decrease would go below zero. The caller must query the
    /// current allowance first if it wants a "reduce to at most" semantic.
    #[error("allowance arithmetic underflow")]
    ArithmeticUnderflow,

    /// Failure surfaced verbatim from the asset ledger.
    #[error(transparent)]
    Asset(#[from] AssetError),
}
