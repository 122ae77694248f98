//! Store abstraction beneath the transfer engine.
//!
//! The engine owns the business invariants; the store owns physical
//! persistence and concurrency control. Atomicity support is reported as a
//! typed error variant, never inferred from error message text.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::{AccountSnapshot, TransferCommit, TransferRecord};

/// Errors surfaced by a [`TransferStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The deployment cannot apply multi-record writes atomically.
    ///
    /// Internal signal only: the engine reacts by running its sequential
    /// fallback, and this variant never reaches a caller.
    #[error("atomic multi-record writes are not available")]
    AtomicityUnavailable,

    /// A compare-and-write lost against a concurrent writer.
    #[error("account {0} was modified concurrently")]
    VersionConflict(Uuid),

    /// Any other persistence failure.
    #[error("store error: {0}")]
    Backend(String),
}

/// Persistence operations the transfer engine needs.
///
/// Balance writes are conditional on the version observed at read time;
/// implementations must fail with [`StoreError::VersionConflict`] when the
/// stored version has moved.
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Looks up an account by id.
    async fn find_account(&self, id: Uuid) -> Result<Option<AccountSnapshot>, StoreError>;

    /// Looks up an account by lowercased email.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountSnapshot>, StoreError>;

    /// Applies both balance updates and the ledger append as one atomic unit.
    ///
    /// Returns [`StoreError::AtomicityUnavailable`] when the deployment
    /// cannot provide multi-record atomicity, leaving state untouched.
    async fn commit_transfer(&self, commit: &TransferCommit) -> Result<(), StoreError>;

    /// Writes one account balance, conditional on `expected_version`.
    async fn save_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> Result<(), StoreError>;

    /// Appends one immutable ledger record.
    async fn append_record(&self, record: &TransferRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: TransferStore + ?Sized> TransferStore for std::sync::Arc<T> {
    async fn find_account(&self, id: Uuid) -> Result<Option<AccountSnapshot>, StoreError> {
        (**self).find_account(id).await
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        (**self).find_account_by_email(email).await
    }

    async fn commit_transfer(&self, commit: &TransferCommit) -> Result<(), StoreError> {
        (**self).commit_transfer(commit).await
    }

    async fn save_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        (**self)
            .save_balance(account_id, new_balance, expected_version)
            .await
    }

    async fn append_record(&self, record: &TransferRecord) -> Result<(), StoreError> {
        (**self).append_record(record).await
    }
}
