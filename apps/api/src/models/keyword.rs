use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub keyword: String,
    pub search_volume: i64,
    /// 0–100, from the keyword research vendor.
    pub difficulty: f64,
    pub cpc: f64,
    /// Lowercase intent label ("informational", ...).
    pub intent: String,
    /// AI-generated topic cluster, when clustering has run.
    pub cluster: Option<String>,
    /// 0–100 priority score from the intelligence engine.
    pub priority: i16,
    /// True once content targeting this keyword has been published.
    pub tracked: bool,
    pub target_url: Option<String>,
    /// "semrush" | "competitor" | "ai-generated"
    pub source: String,
    pub discovered_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
