//! Transfer-log repository: paginated, newest-first history queries.
//!
//! The log itself is written by the transfer store; this repository only
//! reads it.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use centime_shared::types::PageRequest;

use crate::entities::{accounts, transfers};

/// Which side of the ledger a history query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Transfers where the account is the receiver.
    Incoming,
    /// Transfers where the account is the sender.
    Outgoing,
}

impl TransferDirection {
    /// Parses the wire `type` parameter (`in` | `out`).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::Incoming),
            "out" => Some(Self::Outgoing),
            _ => None,
        }
    }
}

/// One transfer row joined with the counterparty's email.
#[derive(Debug, Clone)]
pub struct TransferWithCounterparty {
    /// The transfer record.
    pub transfer: transfers::Model,
    /// Email of the other party, if that account still resolves.
    pub other_email: Option<String>,
}

/// Transfer repository for history queries.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transfers touching `account_id` on the given side, newest
    /// first, returning the requested page plus the total row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
        direction: TransferDirection,
        page: PageRequest,
    ) -> Result<(Vec<TransferWithCounterparty>, u64), DbErr> {
        let side = match direction {
            TransferDirection::Incoming => transfers::Column::ReceiverId,
            TransferDirection::Outgoing => transfers::Column::SenderId,
        };

        let paginator = transfers::Entity::find()
            .filter(Condition::all().add(side.eq(account_id)))
            .order_by_desc(transfers::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.page.saturating_sub(1)).await?;

        let emails = self.counterparty_emails(&rows, direction).await?;
        let items = rows
            .into_iter()
            .map(|transfer| {
                let other_id = match direction {
                    TransferDirection::Incoming => transfer.sender_id,
                    TransferDirection::Outgoing => transfer.receiver_id,
                };
                TransferWithCounterparty {
                    other_email: emails.get(&other_id).cloned(),
                    transfer,
                }
            })
            .collect();

        Ok((items, total))
    }

    /// Batch-resolves counterparty emails for one page of rows.
    async fn counterparty_emails(
        &self,
        rows: &[transfers::Model],
        direction: TransferDirection,
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        let ids: Vec<Uuid> = rows
            .iter()
            .map(|t| match direction {
                TransferDirection::Incoming => t.sender_id,
                TransferDirection::Outgoing => t.receiver_id,
            })
            .collect();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let accounts = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(accounts.into_iter().map(|a| (a.id, a.email)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_param() {
        assert_eq!(
            TransferDirection::from_param("in"),
            Some(TransferDirection::Incoming)
        );
        assert_eq!(
            TransferDirection::from_param("out"),
            Some(TransferDirection::Outgoing)
        );
        assert_eq!(TransferDirection::from_param("sideways"), None);
        assert_eq!(TransferDirection::from_param(""), None);
    }
}
