//! `SeaORM` Entity for the transfers table.
//!
//! Rows are append-only: no code path updates or deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One completed peer-to-peer transfer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    /// Record identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Debited account.
    pub sender_id: Uuid,
    /// Credited account.
    pub receiver_id: Uuid,
    /// Transferred amount, strictly positive.
    pub amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Sending account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::SenderId",
        to = "super::accounts::Column::Id"
    )]
    Sender,
    /// Receiving account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ReceiverId",
        to = "super::accounts::Column::Id"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}
