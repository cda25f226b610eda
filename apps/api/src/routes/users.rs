//! Axum route handlers for account events.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::credit::CreditTransactionRow;
use crate::models::notification::NotificationRow;
use crate::models::user::UserRow;
use crate::pipeline::onboarding::{handle_plan_upgraded, handle_user_created};
use crate::state::AppState;

const KNOWN_PLANS: &[&str] = &["free", "starter", "growth", "pro", "agency", "enterprise"];

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    /// Domain supplied at signup; creates a default project when present.
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: UserRow,
    pub default_project_id: Option<Uuid>,
}

/// POST /api/v1/users
///
/// Signup: creates the user row and runs the onboarding flow (welcome
/// notification, signup credits, optional default project).
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AppError> {
    if !request.email.contains('@') {
        return Err(AppError::Validation("email must be an address".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users
            (id, email, name, plan, subscription_status, credits, keywords_tracked,
             content_generated, backlinks_earned, email_notifications, created_at)
        VALUES ($1, $2, $3, 'free', 'trialing', 0, 0, 0, 0, TRUE, NOW())
        "#,
    )
    .bind(user_id)
    .bind(request.email.trim())
    .bind(request.name.trim())
    .execute(&state.db)
    .await?;

    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    let default_project_id = handle_user_created(
        &state.db,
        &state.notifier,
        &state.config.app_base_url,
        &user,
        request.domain.as_deref(),
    )
    .await
    .map_err(AppError::Internal)?;

    // Re-read: onboarding granted the signup bonus.
    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(CreateUserResponse {
        user,
        default_project_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpgradePlanRequest {
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct UpgradePlanResponse {
    pub user_id: Uuid,
    pub plan: String,
}

/// POST /api/v1/users/:id/plan
///
/// Plan change event: persists the plan and notifies the user of the new
/// limits.
pub async fn handle_upgrade_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpgradePlanRequest>,
) -> Result<Json<UpgradePlanResponse>, AppError> {
    if !KNOWN_PLANS.contains(&request.plan.as_str()) {
        return Err(AppError::Validation(format!(
            "unknown plan {:?}",
            request.plan
        )));
    }

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    handle_plan_upgraded(&state.db, &state.notifier, user_id, &request.plan)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(UpgradePlanResponse {
        user_id,
        plan: request.plan,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationRow>,
}

/// GET /api/v1/users/:id/notifications
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<NotificationListResponse>, AppError> {
    let notifications = sqlx::query_as::<_, NotificationRow>(
        "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT 100",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(NotificationListResponse { notifications }))
}

#[derive(Debug, Serialize)]
pub struct CreditLedgerResponse {
    pub transactions: Vec<CreditTransactionRow>,
    pub balance: i64,
}

/// GET /api/v1/users/:id/credits
///
/// The append-only credit ledger, newest first, with the current balance.
pub async fn handle_list_credits(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CreditLedgerResponse>, AppError> {
    let balance: Option<i64> = sqlx::query_scalar("SELECT credits FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    let Some(balance) = balance else {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    };

    let transactions = sqlx::query_as::<_, CreditTransactionRow>(
        "SELECT * FROM credit_transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT 200",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(CreditLedgerResponse {
        transactions,
        balance,
    }))
}
