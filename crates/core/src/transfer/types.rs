//! Domain types for the transfer engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Created but not yet activated via the emailed PIN link.
    Inactive,
    /// Fully activated; may originate transfers.
    Active,
    /// Administratively blocked.
    Blocked,
}

/// A point-in-time read of one account, as seen by the engine.
///
/// The `version` is the optimistic-locking token observed at read time;
/// every write carries it back so a conflicting concurrent write is
/// detected instead of silently lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Account identifier.
    pub id: Uuid,
    /// Lowercased email, the secondary lookup key.
    pub email: String,
    /// Current balance, quantized to two fractional digits.
    pub balance: Decimal,
    /// Activation status.
    pub status: AccountStatus,
    /// Optimistic-locking version observed at read time.
    pub version: i64,
}

/// One immutable ledger entry for a completed transfer.
///
/// Records are append-only: created exactly once per successful transfer
/// and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Debited account.
    pub sender_id: Uuid,
    /// Credited account.
    pub receiver_id: Uuid,
    /// Transferred amount, strictly positive.
    pub amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Creates a new record with a fresh id and timestamp.
    #[must_use]
    pub fn new(sender_id: Uuid, receiver_id: Uuid, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            amount,
            created_at: Utc::now(),
        }
    }
}

/// The three-write unit of one transfer: both balance updates plus the
/// ledger record, with the versions each balance write is conditional on.
#[derive(Debug, Clone)]
pub struct TransferCommit {
    /// Debited account.
    pub sender_id: Uuid,
    /// Sender's balance after the debit.
    pub sender_new_balance: Decimal,
    /// Sender version observed at read time.
    pub sender_version: i64,
    /// Credited account.
    pub receiver_id: Uuid,
    /// Receiver's balance after the credit.
    pub receiver_new_balance: Decimal,
    /// Receiver version observed at read time.
    pub receiver_version: i64,
    /// The ledger record to append.
    pub record: TransferRecord,
}
