//! Axum route handlers for projects and their keyword/backlink/report
//! listings.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intelligence::intent::IntentLabel;
use crate::models::backlink::BacklinkRow;
use crate::models::content::ContentRow;
use crate::models::keyword::KeywordRow;
use crate::models::project::ProjectRow;
use crate::models::report::ReportRow;
use crate::pipeline::discovery::priority_for;
use crate::pipeline::onboarding::handle_project_created;
use crate::state::AppState;
use crate::vendors::ahrefs::DomainMetrics;
use crate::vendors::semrush::DomainOverview;

/// Research preview is capped regardless of the requested limit.
const RESEARCH_LIMIT_CAP: u32 = 50;

async fn get_project(pool: &PgPool, project_id: Uuid) -> Result<ProjectRow, AppError> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(project_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub user_id: Uuid,
    pub domain: String,
    pub name: Option<String>,
    pub target_market: Option<String>,
    #[serde(default)]
    pub competitor_domains: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub project: ProjectRow,
    pub keywords_found: i64,
    pub llms_txt: String,
}

/// POST /api/v1/projects
///
/// Creates a project and runs the setup flow: competitor keyword discovery
/// and llms.txt generation.
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, AppError> {
    let domain = request.domain.trim().to_lowercase();
    if domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation("domain must be a hostname".to_string()));
    }

    let owner_email: Option<String> = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
        .bind(request.user_id)
        .fetch_optional(&state.db)
        .await?;
    let Some(owner_email) = owner_email else {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            request.user_id
        )));
    };

    let project_id = Uuid::new_v4();
    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{domain} SEO"));
    let target_market = request
        .target_market
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "us".to_string())
        .to_lowercase();

    sqlx::query(
        r#"
        INSERT INTO projects
            (id, user_id, name, domain, target_market, status, competitor_domains,
             gsc_connected, created_at)
        VALUES ($1, $2, $3, $4, $5, 'active', $6, FALSE, NOW())
        "#,
    )
    .bind(project_id)
    .bind(request.user_id)
    .bind(&name)
    .bind(&domain)
    .bind(&target_market)
    .bind(&request.competitor_domains)
    .execute(&state.db)
    .await?;

    let project = get_project(&state.db, project_id).await?;

    let setup = handle_project_created(
        &state.db,
        &state.semrush,
        &state.notifier,
        &state.config.app_base_url,
        &project,
        Some(&owner_email),
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(CreateProjectResponse {
        project,
        keywords_found: setup.keywords_found,
        llms_txt: setup.llms_txt,
    }))
}

#[derive(Debug, Serialize)]
pub struct KeywordListResponse {
    pub keywords: Vec<KeywordRow>,
}

/// GET /api/v1/projects/:id/keywords
///
/// The project's backlog, highest priority first.
pub async fn handle_list_keywords(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<KeywordListResponse>, AppError> {
    get_project(&state.db, project_id).await?;
    let keywords = sqlx::query_as::<_, KeywordRow>(
        "SELECT * FROM keywords WHERE project_id = $1 ORDER BY priority DESC, keyword ASC",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(KeywordListResponse { keywords }))
}

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub keyword: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ResearchedKeyword {
    pub keyword: String,
    pub search_volume: u64,
    pub difficulty: f64,
    pub cpc: f64,
    pub intent: IntentLabel,
    pub priority: i16,
}

#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub results: Vec<ResearchedKeyword>,
}

/// POST /api/v1/projects/:id/keywords/research
///
/// On-demand research preview: vendor lookup + scoring, nothing persisted.
pub async fn handle_research_keywords(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, AppError> {
    if request.keyword.trim().is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }
    let project = get_project(&state.db, project_id).await?;
    let limit = request.limit.unwrap_or(20).min(RESEARCH_LIMIT_CAP);

    let results = state
        .semrush
        .research_keywords(request.keyword.trim(), &project.target_market, limit)
        .await
        .map_err(|e| AppError::Vendor(e.to_string()))?;

    let results = results
        .into_iter()
        .map(|kw| ResearchedKeyword {
            priority: priority_for(&kw),
            keyword: kw.keyword,
            search_volume: kw.search_volume,
            difficulty: kw.difficulty,
            cpc: kw.cpc,
            intent: kw.intent,
        })
        .collect();

    Ok(Json(ResearchResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct BacklinkListResponse {
    pub backlinks: Vec<BacklinkRow>,
}

/// GET /api/v1/projects/:id/backlinks
pub async fn handle_list_backlinks(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<BacklinkListResponse>, AppError> {
    get_project(&state.db, project_id).await?;
    let backlinks = sqlx::query_as::<_, BacklinkRow>(
        "SELECT * FROM backlinks WHERE project_id = $1 ORDER BY discovered_at DESC",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(BacklinkListResponse { backlinks }))
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub content: Vec<ContentRow>,
}

/// GET /api/v1/projects/:id/content
pub async fn handle_list_content(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ContentListResponse>, AppError> {
    get_project(&state.db, project_id).await?;
    let content = sqlx::query_as::<_, ContentRow>(
        "SELECT * FROM content WHERE project_id = $1 ORDER BY published_at DESC NULLS LAST",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(ContentListResponse { content }))
}

#[derive(Debug, Serialize)]
pub struct DomainOverviewResponse {
    pub rankings: DomainOverview,
    pub authority: DomainMetrics,
}

/// GET /api/v1/projects/:id/overview
///
/// Live domain snapshot straight from both vendors, nothing persisted.
pub async fn handle_domain_overview(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<DomainOverviewResponse>, AppError> {
    let project = get_project(&state.db, project_id).await?;

    let rankings = state
        .semrush
        .domain_overview(&project.domain)
        .await
        .map_err(|e| AppError::Vendor(e.to_string()))?;
    let authority = state
        .ahrefs
        .domain_metrics(&project.domain)
        .await
        .map_err(|e| AppError::Vendor(e.to_string()))?;

    Ok(Json(DomainOverviewResponse { rankings, authority }))
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportRow>,
}

/// GET /api/v1/projects/:id/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ReportListResponse>, AppError> {
    get_project(&state.db, project_id).await?;
    let reports = sqlx::query_as::<_, ReportRow>(
        "SELECT * FROM reports WHERE project_id = $1 ORDER BY generated_at DESC",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(ReportListResponse { reports }))
}
