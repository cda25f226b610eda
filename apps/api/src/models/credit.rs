use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only ledger of credit movements. `balance` is the user's balance
/// after this transaction, so the ledger is auditable without replaying.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditTransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// "bonus" | "earned" | "spent"
    pub tx_type: String,
    /// Signed delta; negative for spends.
    pub amount: i64,
    pub balance: i64,
    pub reason: String,
    pub related_backlink_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
