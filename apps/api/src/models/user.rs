use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// "free" | "starter" | "growth" | "pro" | "agency" | "enterprise"
    pub plan: String,
    /// "active" | "trialing" | "past_due" | "canceled"
    pub subscription_status: String,
    /// Backlink reward program balance.
    pub credits: i64,
    pub keywords_tracked: i32,
    pub content_generated: i32,
    pub backlinks_earned: i32,
    pub email_notifications: bool,
    pub slack_webhook: Option<String>,
    pub created_at: DateTime<Utc>,
}
