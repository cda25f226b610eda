use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub domain: String,
    /// Two-letter market database code passed to keyword research ("us", "uk", ...).
    pub target_market: String,
    /// "active" | "paused"
    pub status: String,
    pub competitor_domains: Vec<String>,
    /// Search Console property URL, when the integration is connected.
    pub gsc_site_url: Option<String>,
    pub gsc_connected: bool,
    pub created_at: DateTime<Utc>,
}
