//! Keyword discovery — competitor seeding at project creation and the
//! daily expansion loop.
//!
//! Flow (daily): active projects → plan keyword limit check → top seed
//! keywords → related-keyword research → dedup → score → insert.

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::enrichment;
use crate::intelligence::priority::{calculate_priority, KeywordMetrics};
use crate::intelligence::sanitize::clamp_metrics;
use crate::llm_client::LlmClient;
use crate::models::project::ProjectRow;
use crate::pipeline::plan;
use crate::state::AppState;
use crate::vendors::semrush::{KeywordData, SemrushClient};

/// Competitors mined per new project.
const COMPETITOR_SAMPLE: usize = 3;
/// Keywords pulled per competitor report.
const COMPETITOR_REPORT_LIMIT: u32 = 50;
/// Viable competitor keywords kept per competitor.
const COMPETITOR_KEEP: usize = 20;
/// Seed keywords used per expansion run.
const EXPANSION_SEEDS: usize = 5;
/// Related keywords requested per seed.
const EXPANSION_REPORT_LIMIT: u32 = 20;
/// Seeds must already score at least this priority.
const SEED_PRIORITY_FLOOR: i16 = 70;
/// Unclustered keywords sent to the LLM per clustering pass.
const CLUSTER_BATCH: i64 = 40;

/// Computes the stored priority for a vendor keyword row. Vendor data is
/// clamped into the scoring domain first.
pub fn priority_for(kw: &KeywordData) -> i16 {
    let metrics = KeywordMetrics {
        search_volume: kw.search_volume,
        difficulty: kw.difficulty,
        cpc: kw.cpc,
        current_position: kw.current_position,
    };
    calculate_priority(&clamp_metrics(&metrics)) as i16
}

/// Competitor keywords worth stealing: real volume, not yet locked up.
pub fn is_viable_competitor_keyword(kw: &KeywordData) -> bool {
    kw.search_volume > 100 && kw.difficulty < 60.0
}

/// Inserts a keyword unless the project already tracks that phrase.
/// Returns whether a row was inserted.
pub async fn insert_keyword_if_new(
    pool: &PgPool,
    project_id: Uuid,
    kw: &KeywordData,
    source: &str,
) -> Result<bool> {
    let exists: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM keywords WHERE project_id = $1 AND keyword = $2")
            .bind(project_id)
            .bind(&kw.keyword)
            .fetch_optional(pool)
            .await?;
    if exists.is_some() {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO keywords
            (id, project_id, keyword, search_volume, difficulty, cpc, intent,
             priority, tracked, source, discovered_at, last_updated)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, NOW(), NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(&kw.keyword)
    .bind(kw.search_volume as i64)
    .bind(kw.difficulty)
    .bind(kw.cpc)
    .bind(kw.intent.as_str())
    .bind(priority_for(kw))
    .bind(source)
    .execute(pool)
    .await?;

    Ok(true)
}

/// Seeds a new project's backlog from its competitors' organic keywords.
/// Each competitor is an isolated unit of work — a vendor failure on one
/// domain must not starve the rest.
pub async fn discover_competitor_keywords(
    pool: &PgPool,
    semrush: &SemrushClient,
    project: &ProjectRow,
) -> Result<u64> {
    let mut inserted = 0u64;

    for competitor in project.competitor_domains.iter().take(COMPETITOR_SAMPLE) {
        let keywords = match semrush
            .competitor_keywords(competitor, COMPETITOR_REPORT_LIMIT)
            .await
        {
            Ok(k) => k,
            Err(e) => {
                warn!("Competitor research failed for {competitor}: {e}");
                continue;
            }
        };

        let viable: Vec<&KeywordData> = keywords
            .iter()
            .filter(|k| is_viable_competitor_keyword(k))
            .take(COMPETITOR_KEEP)
            .collect();

        for kw in viable {
            match insert_keyword_if_new(pool, project.id, kw, "competitor").await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to insert keyword {:?}: {e}", kw.keyword),
            }
        }
    }

    info!(
        "Competitor discovery for project {} ({}): {} new keywords",
        project.id, project.domain, inserted
    );
    Ok(inserted)
}

/// Expands a project's backlog from its highest-priority keywords, staying
/// under the plan's keyword limit.
pub async fn expand_project_keywords(
    pool: &PgPool,
    semrush: &SemrushClient,
    project: &ProjectRow,
    keyword_limit: i64,
) -> Result<u64> {
    let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM keywords WHERE project_id = $1")
        .bind(project.id)
        .fetch_one(pool)
        .await?;
    if current >= keyword_limit {
        return Ok(0);
    }

    let seeds: Vec<String> = sqlx::query_scalar(
        "SELECT keyword FROM keywords WHERE project_id = $1 AND priority >= $2 \
         ORDER BY priority DESC LIMIT $3",
    )
    .bind(project.id)
    .bind(SEED_PRIORITY_FLOOR)
    .bind(EXPANSION_SEEDS as i64)
    .fetch_all(pool)
    .await?;

    let mut budget = keyword_limit - current;
    let mut inserted = 0u64;

    for seed in &seeds {
        if budget <= 0 {
            break;
        }
        let related = match semrush
            .research_keywords(seed, &project.target_market, EXPANSION_REPORT_LIMIT)
            .await
        {
            Ok(k) => k,
            Err(e) => {
                warn!("Keyword research failed for seed {seed:?}: {e}");
                continue;
            }
        };

        for kw in &related {
            if budget <= 0 {
                break;
            }
            match insert_keyword_if_new(pool, project.id, kw, "ai-generated").await {
                Ok(true) => {
                    inserted += 1;
                    budget -= 1;
                }
                Ok(false) => {}
                Err(e) => warn!("Failed to insert keyword {:?}: {e}", kw.keyword),
            }
        }
    }

    if inserted > 0 {
        info!(
            "Expanded project {} backlog by {} keywords",
            project.id, inserted
        );
    }
    Ok(inserted)
}

/// Assigns AI topic clusters to keywords that lack one, a batch at a time.
/// Returns the number of keywords updated.
pub async fn cluster_project_keywords(
    pool: &PgPool,
    llm: &LlmClient,
    project_id: Uuid,
) -> Result<u64> {
    let unclustered: Vec<String> = sqlx::query_scalar(
        "SELECT keyword FROM keywords WHERE project_id = $1 AND cluster IS NULL LIMIT $2",
    )
    .bind(project_id)
    .bind(CLUSTER_BATCH)
    .fetch_all(pool)
    .await?;
    if unclustered.is_empty() {
        return Ok(0);
    }

    let clusters = enrichment::cluster_keywords(llm, &unclustered)
        .await
        .map_err(anyhow::Error::new)?;

    let mut updated = 0u64;
    for (cluster, keywords) in &clusters {
        for keyword in keywords {
            let result = sqlx::query(
                "UPDATE keywords SET cluster = $1, last_updated = NOW() \
                 WHERE project_id = $2 AND keyword = $3",
            )
            .bind(cluster)
            .bind(project_id)
            .bind(keyword)
            .execute(pool)
            .await?;
            updated += result.rows_affected();
        }
    }
    Ok(updated)
}

/// Daily discovery job body: expand every active project under its plan
/// limit. Per-project isolation.
pub async fn run_daily_discovery(state: &AppState) {
    let projects: Vec<ProjectRow> =
        match sqlx::query_as("SELECT * FROM projects WHERE status = 'active'")
            .fetch_all(&state.db)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!("Daily discovery could not list projects: {e}");
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
                    warn!("Daily discovery: user lookup failed for project {}: {e}", project.id);
                    continue;
                }
            };
        let Some(user_plan) = user_plan else {
            warn!("Daily discovery: project {} has no owner, skipping", project.id);
            continue;
        };

        let limit = plan::keyword_limit(&user_plan);
        match expand_project_keywords(&state.db, &state.semrush, project, limit).await {
            Ok(inserted) if inserted > 0 => {
                if let Err(e) =
                    cluster_project_keywords(&state.db, &state.llm, project.id).await
                {
                    warn!("Keyword clustering failed for project {}: {e}", project.id);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Daily discovery failed for project {}: {e}", project.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::intent::IntentLabel;

    fn kw(volume: u64, difficulty: f64, cpc: f64) -> KeywordData {
        KeywordData {
            keyword: "test keyword".to_string(),
            search_volume: volume,
            difficulty,
            cpc,
            intent: IntentLabel::Informational,
            current_position: None,
        }
    }

    #[test]
    fn test_priority_for_matches_engine() {
        // volume 1000 → 10, difficulty 50 → 50: 10*0.4 + 50*0.3 = 19
        assert_eq!(priority_for(&kw(1000, 50.0, 0.0)), 19);
    }

    #[test]
    fn test_priority_for_clamps_vendor_garbage() {
        let bad = kw(500, f64::NAN, -2.0);
        let p = priority_for(&bad);
        assert!((0..=100).contains(&p));
    }

    #[test]
    fn test_priority_for_uses_competitor_position() {
        let mut with_pos = kw(1000, 50.0, 0.0);
        with_pos.current_position = Some(20);
        assert_eq!(priority_for(&with_pos), 22);
    }

    #[test]
    fn test_viability_filter_boundaries() {
        assert!(is_viable_competitor_keyword(&kw(101, 59.9, 0.0)));
        assert!(!is_viable_competitor_keyword(&kw(100, 30.0, 0.0)), "volume must exceed 100");
        assert!(!is_viable_competitor_keyword(&kw(5000, 60.0, 0.0)), "difficulty 60 is too hard");
    }
}
