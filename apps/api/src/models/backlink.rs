use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BacklinkRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub source_url: String,
    pub source_domain: String,
    pub target_url: String,
    pub anchor_text: String,
    pub domain_rating: f64,
    /// "dofollow" | "nofollow" | "ugc" | "sponsored"
    pub link_type: String,
    /// 0–100 from the quality engine, computed at discovery.
    pub quality_score: i16,
    /// "excellent" | "good" | "fair" | "poor"
    pub quality_tier: String,
    /// "active" | "lost"
    pub status: String,
    pub discovered_at: DateTime<Utc>,
    pub last_checked: DateTime<Utc>,
}
