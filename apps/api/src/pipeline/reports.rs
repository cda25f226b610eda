//! Weekly performance reports — metric gathering, AI summary, delivery.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::enrichment::{self, ReportSummary};
use crate::llm_client::LlmClient;
use crate::models::project::ProjectRow;
use crate::models::user::UserRow;
use crate::notify::Notification;
use crate::state::AppState;
use crate::vendors::gsc::GscClient;

const GSC_ROW_LIMIT: u32 = 25_000;

/// Rounded percentage change between two period totals.
/// A zero baseline reads as +100% when anything happened, else 0.
pub fn percentage_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    (((current - previous) / previous) * 100.0).round() as i64
}

/// Human-readable period label, e.g. "Aug 1, 2026 - Aug 8, 2026".
pub fn format_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{} - {}",
        start.format("%b %-d, %Y"),
        end.format("%b %-d, %Y")
    )
}

/// Average position rounded to one decimal, and total clicks, from GSC rows.
pub fn summarize_analytics(rows: &[crate::vendors::gsc::SearchAnalyticsRow]) -> (f64, u64) {
    if rows.is_empty() {
        return (0.0, 0);
    }
    let avg = rows.iter().map(|r| r.position).sum::<f64>() / rows.len() as f64;
    let clicks = rows.iter().map(|r| r.clicks).sum::<f64>().round() as u64;
    ((avg * 10.0).round() / 10.0, clicks)
}

/// Builds and persists one project's weekly report, returning its id.
pub async fn generate_weekly_report(
    pool: &PgPool,
    llm: &LlmClient,
    gsc: &GscClient,
    project: &ProjectRow,
) -> Result<Uuid> {
    let end = Utc::now();
    let start = end - Duration::days(7);
    let previous_start = start - Duration::days(7);

    let keywords_tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM keywords WHERE project_id = $1 AND tracked = TRUE",
    )
    .bind(project.id)
    .fetch_one(pool)
    .await?;

    let content_published = count_in_window(pool, "content", "published_at", project.id, start, end).await?;
    let content_previous =
        count_in_window(pool, "content", "published_at", project.id, previous_start, start).await?;
    let backlinks_earned =
        count_in_window(pool, "backlinks", "discovered_at", project.id, start, end).await?;
    let backlinks_previous =
        count_in_window(pool, "backlinks", "discovered_at", project.id, previous_start, start).await?;

    // Search analytics only when the integration is connected; a vendor
    // failure degrades to zeros rather than blocking the report.
    let (avg_position, organic_traffic) = match (&project.gsc_site_url, project.gsc_connected) {
        (Some(site_url), true) => {
            let rows = gsc
                .search_analytics(
                    site_url,
                    &start.format("%Y-%m-%d").to_string(),
                    &end.format("%Y-%m-%d").to_string(),
                    &["query"],
                    GSC_ROW_LIMIT,
                )
                .await;
            match rows {
                Ok(rows) => summarize_analytics(&rows),
                Err(e) => {
                    warn!("GSC query failed for project {}: {e}", project.id);
                    (0.0, 0)
                }
            }
        }
        _ => (0.0, 0),
    };

    let metrics = json!({
        "keywordsTracked": keywords_tracked,
        "avgPosition": avg_position,
        "contentPublished": content_published,
        "contentChangePct": percentage_change(content_published as f64, content_previous as f64),
        "backlinksEarned": backlinks_earned,
        "backlinksChangePct": percentage_change(backlinks_earned as f64, backlinks_previous as f64),
        "organicTraffic": organic_traffic,
    });

    let summary: ReportSummary = match enrichment::generate_report_summary(llm, &metrics, "the past week").await {
        Ok(s) => s,
        Err(e) => {
            warn!("Report summary LLM call failed for project {}: {e}", project.id);
            ReportSummary::unavailable()
        }
    };

    let report_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO reports
            (id, project_id, report_type, period_start, period_end, metrics,
             summary, recommendations, generated_at)
        VALUES ($1, $2, 'weekly', $3, $4, $5, $6, $7, NOW())
        "#,
    )
    .bind(report_id)
    .bind(project.id)
    .bind(start)
    .bind(end)
    .bind(&metrics)
    .bind(&summary.summary)
    .bind(&summary.recommendations)
    .execute(pool)
    .await?;

    info!(
        "Weekly report {report_id} for project {} ({})",
        project.id,
        format_date_range(start, end)
    );
    Ok(report_id)
}

async fn count_in_window(
    pool: &PgPool,
    table: &str,
    column: &str,
    project_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<i64> {
    // table/column come from the fixed call sites above, never user input
    let sql = format!(
        "SELECT COUNT(*) FROM {table} WHERE project_id = $1 AND {column} >= $2 AND {column} < $3"
    );
    Ok(sqlx::query_scalar(&sql)
        .bind(project_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?)
}

/// Weekly report job body: every active subscriber, every project.
/// Per-project isolation.
pub async fn run_weekly_reports(state: &AppState) {
    let users: Vec<UserRow> =
        match sqlx::query_as("SELECT * FROM users WHERE subscription_status = 'active'")
            .fetch_all(&state.db)
            .await
        {
            Ok(u) => u,
            Err(e) => {
                warn!("Weekly reports could not list users: {e}");
                return;
            }
        };

    for user in &users {
        let projects: Vec<ProjectRow> =
            match sqlx::query_as("SELECT * FROM projects WHERE user_id = $1")
                .bind(user.id)
                .fetch_all(&state.db)
                .await
            {
                Ok(p) => p,
                Err(e) => {
                    warn!("Weekly reports: project list failed for user {}: {e}", user.id);
                    continue;
                }
            };

        for project in &projects {
            let report_id =
                match generate_weekly_report(&state.db, &state.llm, &state.gsc, project).await {
                    Ok(id) => id,
                    Err(e) => {
                        warn!("Weekly report failed for project {}: {e}", project.id);
                        continue;
                    }
                };

            let notification = Notification::new(
                user.id,
                format!("Weekly SEO Report - {}", project.name),
                "Your weekly performance report is ready.",
            )
            .with_action(
                "View Report",
                format!("{}/reports/{report_id}", state.config.app_base_url),
            );
            if let Err(e) = state.notifier.send(&state.db, &notification).await {
                warn!("Report notification failed for project {}: {e}", project.id);
            }

            if let Err(e) = sqlx::query("UPDATE reports SET sent_at = NOW() WHERE id = $1")
                .bind(report_id)
                .execute(&state.db)
                .await
            {
                warn!("Failed to mark report {report_id} sent: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::gsc::SearchAnalyticsRow;
    use chrono::TimeZone;

    #[test]
    fn test_percentage_change_normal_cases() {
        assert_eq!(percentage_change(150.0, 100.0), 50);
        assert_eq!(percentage_change(75.0, 100.0), -25);
        assert_eq!(percentage_change(100.0, 100.0), 0);
    }

    #[test]
    fn test_percentage_change_zero_baseline() {
        assert_eq!(percentage_change(5.0, 0.0), 100);
        assert_eq!(percentage_change(0.0, 0.0), 0);
    }

    #[test]
    fn test_percentage_change_rounds() {
        // 1/3 → 33.33…% → 33
        assert_eq!(percentage_change(4.0, 3.0), 33);
    }

    #[test]
    fn test_format_date_range() {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 8, 8, 0, 0, 0).unwrap();
        assert_eq!(format_date_range(start, end), "Aug 1, 2026 - Aug 8, 2026");
    }

    fn row(position: f64, clicks: f64) -> SearchAnalyticsRow {
        SearchAnalyticsRow {
            page: String::new(),
            query: String::new(),
            clicks,
            impressions: 0.0,
            ctr: 0.0,
            position,
        }
    }

    #[test]
    fn test_summarize_analytics_averages_and_sums() {
        let rows = vec![row(4.0, 10.0), row(9.0, 2.0), row(14.33, 0.0)];
        let (avg, clicks) = summarize_analytics(&rows);
        assert!((avg - 9.1).abs() < 1e-9, "avg was {avg}");
        assert_eq!(clicks, 12);
    }

    #[test]
    fn test_summarize_analytics_empty_is_zero() {
        assert_eq!(summarize_analytics(&[]), (0.0, 0));
    }
}
