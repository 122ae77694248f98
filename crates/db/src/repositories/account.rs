//! Account repository for database operations.
//!
//! Balance writes do not live here; they go through
//! [`crate::store::SeaOrmTransferStore`] so every one carries the
//! optimistic-locking version check.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use centime_shared::types::money;

use crate::entities::{accounts, sea_orm_active_enums::AccountStatus};

/// Input for creating an account at signup.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Email; stored lowercased.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Argon2id hash of the activation PIN.
    pub activation_pin_hash: String,
    /// Activation PIN expiry.
    pub activation_expires_at: DateTime<Utc>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.to_lowercase()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new inactive account with the fixed starting balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, DbErr> {
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.to_lowercase()),
            password_hash: Set(input.password_hash),
            phone_number: Set(input.phone_number),
            balance: Set(money::starting_balance()),
            status: Set(AccountStatus::Inactive),
            activation_pin_hash: Set(Some(input.activation_pin_hash)),
            activation_expires_at: Set(Some(input.activation_expires_at.into())),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(&self.db).await
    }

    /// Activates an account and clears its activation PIN fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn activate(&self, id: Uuid) -> Result<accounts::Model, DbErr> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("account {id}")))?;

        let mut active: accounts::ActiveModel = account.into();
        active.status = Set(AccountStatus::Active);
        active.activation_pin_hash = Set(None);
        active.activation_expires_at = Set(None);
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await
    }
}
