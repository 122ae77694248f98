//! Protected account routes: balance, transfers, adjustments, history.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::{classify, respond};
use crate::middleware::AuthUser;
use centime_core::transfer::{TransferEngine, TransferError};
use centime_db::repositories::transfer::{
    TransferDirection, TransferRepository, TransferWithCounterparty,
};
use centime_db::store::SeaOrmTransferStore;
use centime_shared::AppError;
use centime_shared::types::money;
use centime_shared::types::{PageRequest, PageResponse};

/// Creates the account router (all routes require authentication).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(balance))
        .route("/transactions", post(transfer).get(list_transactions))
        .route("/update-balance", post(update_balance))
}

/// Transfer request payload.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Recipient account email.
    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,
    /// Amount to transfer.
    pub amount: Decimal,
}

/// Balance adjustment request payload.
#[derive(Debug, Deserialize)]
pub struct UpdateBalanceRequest {
    /// Signed delta: positive deposits, negative withdraws.
    pub amount: Decimal,
}

/// Query parameters for the history listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number, 1-indexed.
    pub page: Option<u64>,
    /// Items per page.
    #[serde(rename = "pageSize")]
    pub page_size: Option<u64>,
    /// Ledger side, `in` or `out`. Defaults to `in`.
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
        .clamped()
    }
}

/// One history row as served to clients.
#[derive(Debug, Serialize)]
pub struct TransactionItem {
    /// Transfer record ID.
    pub id: Uuid,
    /// Transferred amount, 2-decimal display string.
    pub amount: String,
    /// Counterparty email, empty if that account no longer resolves.
    #[serde(rename = "otherMail")]
    pub other_mail: String,
    /// Transfer timestamp, RFC 3339.
    pub date: String,
    /// 1-based absolute position across all pages, newest first.
    pub row: u64,
}

fn engine(state: &AppState) -> TransferEngine<SeaOrmTransferStore> {
    TransferEngine::new(SeaOrmTransferStore::new(
        (*state.db).clone(),
        state.atomic_writes,
    ))
}

/// GET /balance - Returns the authenticated account's current balance.
async fn balance(State(state): State<AppState>, user: AuthUser) -> Response {
    match engine(&state).balance(user.account_id()).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "balance": money::display(balance) })),
        )
            .into_response(),
        Err(e) => transfer_error_response(&e),
    }
}

/// POST /transactions - Moves money to another account.
async fn transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> Response {
    match engine(&state)
        .transfer(user.account_id(), &payload.recipient_email, payload.amount)
        .await
    {
        Ok(record) => {
            info!(
                transfer_id = %record.id,
                sender_id = %record.sender_id,
                "Transfer completed"
            );
            (
                StatusCode::OK,
                Json(json!({ "message": "Transfer successful" })),
            )
                .into_response()
        }
        Err(e) => transfer_error_response(&e),
    }
}

/// POST /update-balance - Deposits or withdraws on the authenticated account.
async fn update_balance(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateBalanceRequest>,
) -> Response {
    match engine(&state)
        .adjust_balance(user.account_id(), payload.amount)
        .await
    {
        Ok(new_balance) => (
            StatusCode::OK,
            Json(json!({
                "message": "Balance updated",
                "newBalance": money::display(new_balance)
            })),
        )
            .into_response(),
        Err(e) => transfer_error_response(&e),
    }
}

/// GET /transactions - Paginated transfer history, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Response {
    let direction = match query.direction.as_deref() {
        None => TransferDirection::Incoming,
        Some(raw) => match TransferDirection::from_param(raw) {
            Some(d) => d,
            None => {
                return respond(&AppError::Validation("Invalid transaction type".into()));
            }
        },
    };

    let page = query.page_request();
    let repo = TransferRepository::new((*state.db).clone());

    let (rows, total) = match repo
        .list_for_account(user.account_id(), direction, page)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Database error listing transactions");
            return respond(&AppError::Database("An unexpected error occurred".into()));
        }
    };

    let items = history_items(rows, page.first_row());

    (StatusCode::OK, Json(PageResponse::new(items, page, total))).into_response()
}

/// Assembles wire rows from one fetched page, numbering each item by its
/// 1-based absolute position across pages.
#[allow(clippy::cast_possible_truncation)]
fn history_items(rows: Vec<TransferWithCounterparty>, first_row: u64) -> Vec<TransactionItem> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| TransactionItem {
            id: row.transfer.id,
            amount: money::display(row.transfer.amount),
            other_mail: row.other_email.unwrap_or_default(),
            date: row.transfer.created_at.to_rfc3339(),
            row: first_row + i as u64,
        })
        .collect()
}

/// Maps engine failures to the wire error contract.
///
/// Rejections (validation and business rules) are client errors;
/// contention and store failures are server errors and get logged.
fn transfer_error_response(e: &TransferError) -> Response {
    let err = classify(e);
    if err.status_code() >= 500 {
        error!(error = %e, "Transfer operation failed");
    }
    respond(&err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use centime_core::transfer::StoreError;
    use centime_db::entities::transfers;
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(TransferError::InvalidRecipient, 400)]
    #[case(TransferError::InvalidAmount, 400)]
    #[case(TransferError::RecipientNotFound, 400)]
    #[case(TransferError::AccountNotFound, 400)]
    #[case(TransferError::SenderNotActive, 400)]
    #[case(TransferError::SelfTransfer, 400)]
    #[case(TransferError::InsufficientFunds, 400)]
    #[case(TransferError::Contention, 500)]
    #[case(TransferError::Store(StoreError::Backend("boom".into())), 500)]
    fn test_engine_errors_map_to_wire_status(#[case] error: TransferError, #[case] expected: u16) {
        let response = transfer_error_response(&error);
        assert_eq!(response.status().as_u16(), expected);
    }

    fn history_row(amount: Decimal, other_email: Option<&str>) -> TransferWithCounterparty {
        TransferWithCounterparty {
            transfer: transfers::Model {
                id: Uuid::new_v4(),
                sender_id: Uuid::new_v4(),
                receiver_id: Uuid::new_v4(),
                amount,
                created_at: Utc::now().into(),
            },
            other_email: other_email.map(str::to_string),
        }
    }

    #[test]
    fn test_history_rows_number_across_pages() {
        let page_three = PageRequest {
            page: 3,
            page_size: 10,
        };
        let items = history_items(
            vec![
                history_row(dec!(10), Some("bob@example.com")),
                history_row(dec!(2.5), None),
            ],
            page_three.first_row(),
        );

        assert_eq!(items[0].row, 21);
        assert_eq!(items[1].row, 22);
        assert_eq!(items[0].amount, "10.00");
        assert_eq!(items[1].amount, "2.50");
        assert_eq!(items[0].other_mail, "bob@example.com");
        assert_eq!(items[1].other_mail, "");
    }
}
