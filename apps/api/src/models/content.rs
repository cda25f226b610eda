use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub slug: String,
    pub url: String,
    /// "blog" | "how-to"
    pub content_type: String,
    pub target_keywords: Vec<String>,
    pub meta_description: String,
    pub word_count: i32,
    pub content_brief: String,
    pub body_markdown: String,
    /// schema.org JSON-LD — a single object or an array of them.
    pub schema_markup: Value,
    /// "published" | "draft"
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
