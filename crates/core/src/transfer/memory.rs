//! In-memory store with the same compare-and-write semantics as the real
//! database store.
//!
//! Serves two purposes: the substitutable fake for engine tests (including
//! failure injection for the atomic-abort property) and a reference
//! implementation of the store contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::store::{StoreError, TransferStore};
use super::types::{AccountSnapshot, AccountStatus, TransferCommit, TransferRecord};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<Uuid, AccountSnapshot>,
    records: Vec<TransferRecord>,
}

/// In-memory [`TransferStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    atomic_writes: bool,
    fail_next_append: AtomicBool,
}

impl MemoryStore {
    /// Creates a store with atomic multi-record writes available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            atomic_writes: true,
            fail_next_append: AtomicBool::new(false),
        }
    }

    /// Creates a store that reports atomicity as unavailable, forcing the
    /// engine onto its sequential fallback path.
    #[must_use]
    pub fn without_atomic_writes() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            atomic_writes: false,
            fail_next_append: AtomicBool::new(false),
        }
    }

    /// Inserts an active account and returns its id.
    pub fn insert_account(&self, email: &str, balance: Decimal) -> Uuid {
        self.insert_account_with_status(email, balance, AccountStatus::Active)
    }

    /// Inserts an account with an explicit status and returns its id.
    pub fn insert_account_with_status(
        &self,
        email: &str,
        balance: Decimal,
        status: AccountStatus,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let snapshot = AccountSnapshot {
            id,
            email: email.to_lowercase(),
            balance,
            status,
            version: 0,
        };
        self.lock().accounts.insert(id, snapshot);
        id
    }

    /// Returns the current balance of an account, if it exists.
    pub fn balance_of(&self, id: Uuid) -> Option<Decimal> {
        self.lock().accounts.get(&id).map(|a| a.balance)
    }

    /// Returns a copy of all appended ledger records, oldest first.
    pub fn records(&self) -> Vec<TransferRecord> {
        self.lock().records.clone()
    }

    /// Makes the next ledger append fail with a backend error.
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn take_append_failure(&self) -> bool {
        self.fail_next_append.swap(false, Ordering::SeqCst)
    }
}

fn check_version(
    inner: &Inner,
    account_id: Uuid,
    expected_version: i64,
) -> Result<(), StoreError> {
    let account = inner
        .accounts
        .get(&account_id)
        .ok_or_else(|| StoreError::Backend(format!("account {account_id} vanished")))?;

    if account.version == expected_version {
        Ok(())
    } else {
        Err(StoreError::VersionConflict(account_id))
    }
}

fn apply_balance(inner: &mut Inner, account_id: Uuid, new_balance: Decimal) {
    if let Some(account) = inner.accounts.get_mut(&account_id) {
        account.balance = new_balance;
        account.version += 1;
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn find_account(&self, id: Uuid) -> Result<Option<AccountSnapshot>, StoreError> {
        Ok(self.lock().accounts.get(&id).cloned())
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        let needle = email.to_lowercase();
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|a| a.email == needle)
            .cloned())
    }

    async fn commit_transfer(&self, commit: &TransferCommit) -> Result<(), StoreError> {
        if !self.atomic_writes {
            return Err(StoreError::AtomicityUnavailable);
        }

        let mut inner = self.lock();

        // Validate the whole unit before mutating anything, so a failure
        // leaves state untouched.
        check_version(&inner, commit.sender_id, commit.sender_version)?;
        check_version(&inner, commit.receiver_id, commit.receiver_version)?;
        if self.take_append_failure() {
            return Err(StoreError::Backend("ledger append failed".to_string()));
        }

        apply_balance(&mut inner, commit.sender_id, commit.sender_new_balance);
        apply_balance(&mut inner, commit.receiver_id, commit.receiver_new_balance);
        inner.records.push(commit.record.clone());

        Ok(())
    }

    async fn save_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        check_version(&inner, account_id, expected_version)?;
        apply_balance(&mut inner, account_id, new_balance);
        Ok(())
    }

    async fn append_record(&self, record: &TransferRecord) -> Result<(), StoreError> {
        if self.take_append_failure() {
            return Err(StoreError::Backend("ledger append failed".to_string()));
        }
        self.lock().records.push(record.clone());
        Ok(())
    }
}
