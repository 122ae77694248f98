//! `SeaORM`-backed implementation of the core transfer store.
//!
//! The atomic path wraps all three writes in one database transaction.
//! Deployments without multi-record atomicity are modeled by the
//! `atomic_writes` configuration flag: the capability is declared up
//! front, never inferred from error text.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use centime_core::transfer::{
    AccountSnapshot, AccountStatus, StoreError, TransferCommit, TransferRecord, TransferStore,
};

use crate::entities::{accounts, sea_orm_active_enums, transfers};

/// Transfer store backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct SeaOrmTransferStore {
    db: DatabaseConnection,
    atomic_writes: bool,
}

impl SeaOrmTransferStore {
    /// Creates a store over the given connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection, atomic_writes: bool) -> Self {
        Self { db, atomic_writes }
    }

    /// Writes one balance conditional on the stored version, on any
    /// connection (pool or open transaction).
    async fn update_balance_on<C: ConnectionTrait>(
        conn: &C,
        account_id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::Balance, Expr::value(new_balance))
            .col_expr(
                accounts::Column::Version,
                Expr::col(accounts::Column::Version).add(1),
            )
            .col_expr(
                accounts::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(accounts::Column::Id.eq(account_id))
            .filter(accounts::Column::Version.eq(expected_version))
            .exec(conn)
            .await
            .map_err(backend)?;

        if result.rows_affected == 0 {
            return Err(StoreError::VersionConflict(account_id));
        }

        Ok(())
    }

    async fn insert_record_on<C: ConnectionTrait>(
        conn: &C,
        record: &TransferRecord,
    ) -> Result<(), StoreError> {
        let row = transfers::ActiveModel {
            id: Set(record.id),
            sender_id: Set(record.sender_id),
            receiver_id: Set(record.receiver_id),
            amount: Set(record.amount),
            created_at: Set(record.created_at.into()),
        };
        row.insert(conn).await.map_err(backend)?;

        Ok(())
    }
}

#[async_trait]
impl TransferStore for SeaOrmTransferStore {
    async fn find_account(&self, id: Uuid) -> Result<Option<AccountSnapshot>, StoreError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?;

        Ok(account.map(snapshot))
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(backend)?;

        Ok(account.map(snapshot))
    }

    async fn commit_transfer(&self, commit: &TransferCommit) -> Result<(), StoreError> {
        if !self.atomic_writes {
            return Err(StoreError::AtomicityUnavailable);
        }

        let txn = self.db.begin().await.map_err(backend)?;

        // Any failure below drops the transaction, rolling everything back.
        Self::update_balance_on(
            &txn,
            commit.sender_id,
            commit.sender_new_balance,
            commit.sender_version,
        )
        .await?;
        Self::update_balance_on(
            &txn,
            commit.receiver_id,
            commit.receiver_new_balance,
            commit.receiver_version,
        )
        .await?;
        Self::insert_record_on(&txn, &commit.record).await?;

        txn.commit().await.map_err(backend)?;

        Ok(())
    }

    async fn save_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        Self::update_balance_on(&self.db, account_id, new_balance, expected_version).await
    }

    async fn append_record(&self, record: &TransferRecord) -> Result<(), StoreError> {
        Self::insert_record_on(&self.db, record).await
    }
}

fn snapshot(account: accounts::Model) -> AccountSnapshot {
    AccountSnapshot {
        id: account.id,
        email: account.email,
        balance: account.balance,
        status: status(&account.status),
        version: account.version,
    }
}

const fn status(status: &sea_orm_active_enums::AccountStatus) -> AccountStatus {
    match status {
        sea_orm_active_enums::AccountStatus::Inactive => AccountStatus::Inactive,
        sea_orm_active_enums::AccountStatus::Active => AccountStatus::Active,
        sea_orm_active_enums::AccountStatus::Blocked => AccountStatus::Blocked,
    }
}

fn backend(e: DbErr) -> StoreError {
    StoreError::Backend(e.to_string())
}
