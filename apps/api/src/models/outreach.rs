use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OutreachRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub target_domain: String,
    pub contact_email: Option<String>,
    /// Credits offered to the target in the value exchange.
    pub credits_offered: i64,
    /// AI-drafted email, held for user review before sending.
    pub email_draft: String,
    /// "pending" | "sent" | "replied" | "closed"
    pub status: String,
    pub created_at: DateTime<Utc>,
}
