//! Axum route handler for credit-gated backlink outreach.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::enrichment::draft_outreach_email;
use crate::errors::AppError;
use crate::models::outreach::OutreachRow;
use crate::models::project::ProjectRow;
use crate::models::user::UserRow;
use crate::notify::Notification;
use crate::state::AppState;

/// Credits spent per outreach request.
const OUTREACH_COST: i64 = 50;
/// Credits offered to the target in the value exchange.
const OUTREACH_OFFER: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    pub project_id: Uuid,
    pub target_domain: String,
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    pub outreach_id: Uuid,
    pub email_draft: String,
    pub credits_remaining: i64,
}

/// POST /api/v1/outreach
///
/// Spends 50 credits to draft a backlink outreach email for user review.
/// The email is never sent automatically.
pub async fn handle_request_outreach(
    State(state): State<AppState>,
    Json(request): Json<OutreachRequest>,
) -> Result<Json<OutreachResponse>, AppError> {
    let target_domain = request.target_domain.trim().to_lowercase();
    if target_domain.is_empty() || !target_domain.contains('.') {
        return Err(AppError::Validation(
            "target_domain must be a hostname".to_string(),
        ));
    }

    let project: ProjectRow = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
        .bind(request.project_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", request.project_id)))?;

    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(project.user_id)
        .fetch_one(&state.db)
        .await?;

    if user.credits < OUTREACH_COST {
        return Err(AppError::InsufficientCredits(format!(
            "Outreach costs {OUTREACH_COST} credits; balance is {}. Earn more by getting backlinks!",
            user.credits
        )));
    }

    let balance = user.credits - OUTREACH_COST;
    sqlx::query(
        r#"
        INSERT INTO credit_transactions (id, user_id, tx_type, amount, balance, reason, created_at)
        VALUES ($1, $2, 'spent', $3, $4, $5, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(-OUTREACH_COST)
    .bind(balance)
    .bind(format!("Backlink outreach to {target_domain}"))
    .execute(&state.db)
    .await?;
    sqlx::query("UPDATE users SET credits = $1 WHERE id = $2")
        .bind(balance)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let email_draft =
        draft_outreach_email(&state.llm, &project.domain, &target_domain, OUTREACH_OFFER).await?;

    let outreach_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO outreach
            (id, project_id, user_id, target_domain, credits_offered, email_draft,
             status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', NOW())
        "#,
    )
    .bind(outreach_id)
    .bind(project.id)
    .bind(user.id)
    .bind(&target_domain)
    .bind(OUTREACH_OFFER)
    .bind(&email_draft)
    .execute(&state.db)
    .await?;

    let notification = Notification::new(
        user.id,
        "Outreach Campaign Created",
        format!("Email draft ready for {target_domain}"),
    )
    .with_action(
        "Review & Send",
        format!("{}/outreach/{outreach_id}", state.config.app_base_url),
    );
    if let Err(e) = state.notifier.send(&state.db, &notification).await {
        warn!("Outreach notification failed for user {}: {e}", user.id);
    }

    Ok(Json(OutreachResponse {
        outreach_id,
        email_draft,
        credits_remaining: balance,
    }))
}

/// GET /api/v1/outreach/:id
pub async fn handle_get_outreach(
    State(state): State<AppState>,
    Path(outreach_id): Path<Uuid>,
) -> Result<Json<OutreachRow>, AppError> {
    let outreach = sqlx::query_as::<_, OutreachRow>("SELECT * FROM outreach WHERE id = $1")
        .bind(outreach_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Outreach {outreach_id} not found")))?;
    Ok(Json(outreach))
}
