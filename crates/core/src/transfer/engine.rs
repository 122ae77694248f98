//! The transfer engine: validates and executes money movement.
//!
//! Every operation re-reads current state immediately before computing its
//! delta and never holds an in-process lock across store I/O; lost updates
//! are prevented by the store's versioned compare-and-write semantics.

use rust_decimal::Decimal;
use uuid::Uuid;

use centime_shared::types::money;

use super::error::TransferError;
use super::store::{StoreError, TransferStore};
use super::types::{AccountSnapshot, AccountStatus, TransferCommit, TransferRecord};
use crate::auth::valid_email_shape;

/// How many times an operation re-reads and retries after losing a
/// compare-and-write race before giving up with [`TransferError::Contention`].
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Executes transfers, balance adjustments, and balance reads against an
/// injected [`TransferStore`].
#[derive(Debug, Clone)]
pub struct TransferEngine<S> {
    store: S,
}

impl<S: TransferStore> TransferEngine<S> {
    /// Creates an engine over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Moves `amount` from `sender_id` to the account owning
    /// `recipient_email`, appending one ledger record.
    ///
    /// The three writes are applied atomically when the store supports it;
    /// otherwise the same mutation re-executes as sequential writes against
    /// freshly re-read state, with the documented weaker guarantee that a
    /// crash between writes leaves the ledger inconsistent.
    ///
    /// # Errors
    ///
    /// Validation, not-found, and insufficient-funds failures reject the
    /// request before any mutation. `Store` errors mean unknown state.
    pub async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_email: &str,
        amount: Decimal,
    ) -> Result<TransferRecord, TransferError> {
        if !valid_email_shape(recipient_email) {
            return Err(TransferError::InvalidRecipient);
        }
        let amount = money::quantize(amount);
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        let recipient_email = recipient_email.to_lowercase();

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (sender, recipient) = self.load_pair(sender_id, &recipient_email).await?;

            if sender.status != AccountStatus::Active {
                return Err(TransferError::SenderNotActive);
            }
            if sender.id == recipient.id {
                return Err(TransferError::SelfTransfer);
            }
            if amount > sender.balance {
                return Err(TransferError::InsufficientFunds);
            }

            let commit = TransferCommit {
                sender_id: sender.id,
                sender_new_balance: money::quantize(sender.balance - amount),
                sender_version: sender.version,
                receiver_id: recipient.id,
                receiver_new_balance: money::quantize(recipient.balance + amount),
                receiver_version: recipient.version,
                record: TransferRecord::new(sender.id, recipient.id, amount),
            };

            match self.store.commit_transfer(&commit).await {
                Ok(()) => return Ok(commit.record),
                Err(StoreError::AtomicityUnavailable) => {
                    return self.commit_sequential(sender.id, recipient.id, amount).await;
                }
                // Lost the race; re-read and re-validate from scratch.
                Err(StoreError::VersionConflict(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransferError::Contention)
    }

    /// Adjusts one balance by a signed delta: deposits when positive,
    /// withdrawals when negative. Zero is accepted as a no-op. Returns the
    /// new balance. No ledger record is produced for this path.
    ///
    /// # Errors
    ///
    /// Fails with `InsufficientFunds` when a withdrawal exceeds the current
    /// balance, keeping the non-negativity invariant.
    pub async fn adjust_balance(
        &self,
        account_id: Uuid,
        delta: Decimal,
    ) -> Result<Decimal, TransferError> {
        let delta = money::quantize(delta);

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let account = self
                .store
                .find_account(account_id)
                .await?
                .ok_or(TransferError::AccountNotFound)?;

            if delta.is_zero() {
                return Ok(account.balance);
            }
            if delta < Decimal::ZERO && -delta > account.balance {
                return Err(TransferError::InsufficientFunds);
            }

            let new_balance = money::quantize(account.balance + delta);
            match self
                .store
                .save_balance(account.id, new_balance, account.version)
                .await
            {
                Ok(()) => return Ok(new_balance),
                Err(StoreError::VersionConflict(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransferError::Contention)
    }

    /// Returns the account's current balance.
    ///
    /// # Errors
    ///
    /// Fails with `AccountNotFound` if the account does not exist.
    pub async fn balance(&self, account_id: Uuid) -> Result<Decimal, TransferError> {
        let account = self
            .store
            .find_account(account_id)
            .await?
            .ok_or(TransferError::AccountNotFound)?;

        Ok(account.balance)
    }

    /// Resolves sender by id and recipient by email as one logical read.
    async fn load_pair(
        &self,
        sender_id: Uuid,
        recipient_email: &str,
    ) -> Result<(AccountSnapshot, AccountSnapshot), TransferError> {
        let sender = self
            .store
            .find_account(sender_id)
            .await?
            .ok_or(TransferError::SenderNotFound)?;
        let recipient = self
            .store
            .find_account_by_email(recipient_email)
            .await?
            .ok_or(TransferError::RecipientNotFound)?;

        Ok((sender, recipient))
    }

    /// Fallback for stores without multi-record atomicity: the same
    /// three-step mutation as independent sequential writes against freshly
    /// re-read state. Ordering across the writes is preserved but isolation
    /// is not; a failure partway through is surfaced, not rolled back.
    async fn commit_sequential(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        amount: Decimal,
    ) -> Result<TransferRecord, TransferError> {
        let sender = self
            .store
            .find_account(sender_id)
            .await?
            .ok_or(TransferError::SenderNotFound)?;
        let recipient = self
            .store
            .find_account(receiver_id)
            .await?
            .ok_or(TransferError::RecipientNotFound)?;

        if amount > sender.balance {
            return Err(TransferError::InsufficientFunds);
        }

        self.store
            .save_balance(
                sender.id,
                money::quantize(sender.balance - amount),
                sender.version,
            )
            .await?;
        self.store
            .save_balance(
                recipient.id,
                money::quantize(recipient.balance + amount),
                recipient.version,
            )
            .await?;

        let record = TransferRecord::new(sender.id, recipient.id, amount);
        self.store.append_record(&record).await?;

        Ok(record)
    }
}
