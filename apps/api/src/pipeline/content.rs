//! Content generation — the daily pipeline that turns the highest-priority
//! untracked keyword into a published article.
//!
//! Flow: monthly limit check → pick target keyword (priority ≥ 60) →
//! brief → article → meta description → title/slug → JSON-LD → persist →
//! mark keyword tracked → notify.

use anyhow::Result;
use chrono::{Datelike, TimeZone, Utc};
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::enrichment;
use crate::llm_client::LlmClient;
use crate::markup::{
    article_schema, extract_how_to_steps, extract_title, how_to_schema, slugify, ArticleParams,
};
use crate::models::keyword::KeywordRow;
use crate::models::project::ProjectRow;
use crate::notify::Notification;
use crate::pipeline::plan;
use crate::state::AppState;

/// Keywords below this priority are not worth an article yet.
const CONTENT_PRIORITY_FLOOR: i16 = 60;
/// Related keywords passed into the brief alongside the target.
const RELATED_KEYWORDS: i64 = 5;

/// A keyword phrased as a how-to query gets a step-by-step guide and HowTo
/// markup instead of a plain article.
pub fn is_how_to(keyword: &str) -> bool {
    keyword.to_lowercase().contains("how to")
}

pub fn word_count(markdown: &str) -> i32 {
    markdown.split_whitespace().count() as i32
}

/// Builds the JSON-LD for a piece of content: always an Article object,
/// wrapped into an array with a HowTo object when the article has numbered
/// step headings.
pub fn build_schema_markup(
    title: &str,
    meta_description: &str,
    url: &str,
    published_iso: &str,
    body_markdown: &str,
    how_to: bool,
) -> Value {
    let article = article_schema(&ArticleParams {
        title,
        description: meta_description,
        url,
        date_published: published_iso,
        date_modified: None,
        author_name: "RankForge AI",
        author_url: Some("https://rankforge.app"),
        image_url: None,
    });

    if how_to {
        let steps = extract_how_to_steps(body_markdown);
        if !steps.is_empty() {
            let guide = how_to_schema(title, meta_description, &steps, None);
            return Value::Array(vec![article, guide]);
        }
    }
    article
}

/// First instant of the current calendar month, for the monthly quota window.
fn month_start(now: chrono::DateTime<Utc>) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .expect("first of month is always a valid instant")
}

/// Generates and publishes one article for a project, if the monthly quota
/// allows and a qualifying keyword exists. Returns the new content id.
pub async fn generate_content_for_project(
    pool: &PgPool,
    llm: &LlmClient,
    project: &ProjectRow,
    monthly_limit: i64,
) -> Result<Option<Uuid>> {
    let window_start = month_start(Utc::now());
    let published_this_month: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM content WHERE project_id = $1 AND published_at >= $2",
    )
    .bind(project.id)
    .bind(window_start)
    .fetch_one(pool)
    .await?;
    if published_this_month >= monthly_limit {
        return Ok(None);
    }

    let candidates: Vec<KeywordRow> = sqlx::query_as(
        "SELECT * FROM keywords WHERE project_id = $1 AND tracked = FALSE AND priority >= $2 \
         ORDER BY priority DESC LIMIT $3",
    )
    .bind(project.id)
    .bind(CONTENT_PRIORITY_FLOOR)
    .bind(RELATED_KEYWORDS + 1)
    .fetch_all(pool)
    .await?;

    let Some(target) = candidates.first() else {
        return Ok(None);
    };
    let related: Vec<String> = candidates[1..].iter().map(|k| k.keyword.clone()).collect();
    let intent = crate::intelligence::intent::IntentLabel::parse(&target.intent)
        .unwrap_or_default();

    let brief =
        enrichment::generate_content_brief(llm, &target.keyword, &related, intent).await?;

    let how_to = is_how_to(&target.keyword);
    let article = enrichment::generate_article(llm, &target.keyword, &brief, how_to).await?;

    let meta_description =
        enrichment::generate_meta_description(llm, &target.keyword, &target.keyword, &brief)
            .await?;

    let title = extract_title(&article).unwrap_or_else(|| target.keyword.clone());
    let slug = slugify(&title);
    let url = format!("https://{}/blog/{}", project.domain, slug);
    let published_at = Utc::now();

    let schema_markup = build_schema_markup(
        &title,
        &meta_description,
        &url,
        &published_at.to_rfc3339(),
        &article,
        how_to,
    );

    let content_id = Uuid::new_v4();
    let content_type = if how_to { "how-to" } else { "blog" };
    sqlx::query(
        r#"
        INSERT INTO content
            (id, project_id, title, slug, url, content_type, target_keywords,
             meta_description, word_count, content_brief, body_markdown,
             schema_markup, status, published_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'published', $13, NOW())
        "#,
    )
    .bind(content_id)
    .bind(project.id)
    .bind(&title)
    .bind(&slug)
    .bind(&url)
    .bind(content_type)
    .bind(vec![target.keyword.clone()])
    .bind(&meta_description)
    .bind(word_count(&article))
    .bind(&brief)
    .bind(&article)
    .bind(&schema_markup)
    .bind(published_at)
    .execute(pool)
    .await?;

    sqlx::query("UPDATE keywords SET tracked = TRUE, target_url = $1, last_updated = NOW() WHERE id = $2")
        .bind(&url)
        .bind(target.id)
        .execute(pool)
        .await?;

    sqlx::query("UPDATE users SET content_generated = content_generated + 1 WHERE id = $1")
        .bind(project.user_id)
        .execute(pool)
        .await?;

    info!(
        "Published {content_type} {content_id} ({} words) for project {} targeting {:?}",
        word_count(&article),
        project.id,
        target.keyword
    );
    Ok(Some(content_id))
}

/// Daily content job body. Per-project isolation.
pub async fn run_daily_content(state: &AppState) {
    let projects: Vec<ProjectRow> =
        match sqlx::query_as("SELECT * FROM projects WHERE status = 'active'")
            .fetch_all(&state.db)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!("Daily content could not list projects: {e}");
                return;
            }
        };

    for project in &projects {
        let user_plan: Option<String> =
            match sqlx::query_scalar("SELECT plan FROM users WHERE id = $1")
                .bind(project.user_id)
                .fetch_optional(&state.db)
                .await
            {
                Ok(p) => p,
                Err(e) => {
                    warn!("Daily content: user lookup failed for project {}: {e}", project.id);
                    continue;
                }
            };
        let Some(user_plan) = user_plan else {
            continue;
        };
        let limit = plan::monthly_content_limit(&user_plan);

        match generate_content_for_project(&state.db, &state.llm, project, limit).await {
            Ok(Some(content_id)) => {
                let title: Option<String> =
                    sqlx::query_scalar("SELECT title FROM content WHERE id = $1")
                        .bind(content_id)
                        .fetch_optional(&state.db)
                        .await
                        .ok()
                        .flatten();
                let url: Option<String> =
                    sqlx::query_scalar("SELECT url FROM content WHERE id = $1")
                        .bind(content_id)
                        .fetch_optional(&state.db)
                        .await
                        .ok()
                        .flatten();
                let notification = Notification::new(
                    project.user_id,
                    "New Content Published",
                    title.unwrap_or_else(|| "New article".to_string()),
                )
                .with_action("View Article", url.unwrap_or_default());
                if let Err(e) = state.notifier.send(&state.db, &notification).await {
                    warn!("Content notification failed for project {}: {e}", project.id);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Content generation failed for project {}: {e}", project.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_how_to_detects_phrase() {
        assert!(is_how_to("how to brew coffee"));
        assert!(is_how_to("How To Start Running"));
        assert!(!is_how_to("best espresso machines"));
        assert!(!is_how_to("howitzer history"));
    }

    #[test]
    fn test_word_count_splits_on_whitespace() {
        assert_eq!(word_count("one two\nthree\tfour"), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_schema_markup_plain_article_is_single_object() {
        let schema = build_schema_markup(
            "Best CRMs",
            "A roundup",
            "https://example.com/blog/best-crms",
            "2026-08-08T00:00:00Z",
            "# Best CRMs\n\nbody",
            false,
        );
        assert_eq!(schema["@type"], "Article");
    }

    #[test]
    fn test_schema_markup_how_to_with_steps_is_array() {
        let body = "# Guide\n## Step 1: Do a thing\n## Step 2: Do the next thing\n";
        let schema = build_schema_markup(
            "Guide",
            "desc",
            "https://example.com/blog/guide",
            "2026-08-08T00:00:00Z",
            body,
            true,
        );
        let arr = schema.as_array().expect("expected [Article, HowTo]");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["@type"], "HowTo");
        assert_eq!(arr[1]["step"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_schema_markup_how_to_without_steps_falls_back_to_article() {
        let schema = build_schema_markup(
            "Guide",
            "desc",
            "https://example.com/blog/guide",
            "2026-08-08T00:00:00Z",
            "# Guide\n\nNo numbered steps here.",
            true,
        );
        assert_eq!(schema["@type"], "Article");
    }

    #[test]
    fn test_month_start_truncates_to_first() {
        let now = Utc.with_ymd_and_hms(2026, 8, 8, 15, 30, 12).unwrap();
        let start = month_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
    }
}
