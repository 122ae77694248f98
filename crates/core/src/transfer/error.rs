//! Error types for the transfer engine.

use thiserror::Error;

use super::store::StoreError;

/// Failures the transfer engine can return to its callers.
///
/// Validation and business-rule variants mean nothing happened and the
/// request can be safely resubmitted; `Store` means the operation is in an
/// unknown state.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Recipient email does not match the expected shape.
    #[error("Invalid recipient email")]
    InvalidRecipient,

    /// Amount is not strictly positive after normalization.
    #[error("Invalid amount")]
    InvalidAmount,

    /// Sender account does not exist.
    #[error("Sender not found")]
    SenderNotFound,

    /// Recipient account does not exist.
    #[error("Recipient not found")]
    RecipientNotFound,

    /// Account does not exist (balance reads and adjustments).
    #[error("Account not found")]
    AccountNotFound,

    /// Sender may not originate transfers in its current status.
    #[error("Account is not active")]
    SenderNotActive,

    /// Sender and recipient are the same account.
    #[error("Cannot transfer to your own account")]
    SelfTransfer,

    /// Sender balance does not cover the requested amount.
    #[error("Insufficient balance")]
    InsufficientFunds,

    /// Conflicting writes kept winning across every retry.
    #[error("Operation aborted after repeated write conflicts, please retry")]
    Contention,

    /// Unexpected persistence failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            // A conflict that escapes the engine's retry loop surfaces as
            // contention rather than a raw store error.
            StoreError::VersionConflict(_) => Self::Contention,
            other => Self::Store(other),
        }
    }
}

impl TransferError {
    /// True when the failure left stored state untouched.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Contention)
    }
}
