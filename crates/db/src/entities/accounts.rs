//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountStatus;

/// One user account with its running balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Account identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Unique lowercased email.
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2id password hash (PHC format).
    pub password_hash: String,
    /// Optional phone number supplied at signup.
    pub phone_number: Option<String>,
    /// Current balance; never negative.
    pub balance: Decimal,
    /// Activation status.
    pub status: AccountStatus,
    /// Argon2id hash of the emailed activation PIN.
    pub activation_pin_hash: Option<String>,
    /// When the activation PIN expires.
    pub activation_expires_at: Option<DateTimeWithTimeZone>,
    /// Optimistic-locking version; bumped on every balance write.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
