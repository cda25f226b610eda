pub mod health;
pub mod intelligence;
pub mod outreach;
pub mod projects;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Account events
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id/plan", post(users::handle_upgrade_plan))
        .route(
            "/api/v1/users/:id/notifications",
            get(users::handle_list_notifications),
        )
        .route("/api/v1/users/:id/credits", get(users::handle_list_credits))
        // Projects
        .route("/api/v1/projects", post(projects::handle_create_project))
        .route(
            "/api/v1/projects/:id/keywords",
            get(projects::handle_list_keywords),
        )
        .route(
            "/api/v1/projects/:id/keywords/research",
            post(projects::handle_research_keywords),
        )
        .route(
            "/api/v1/projects/:id/backlinks",
            get(projects::handle_list_backlinks),
        )
        .route(
            "/api/v1/projects/:id/content",
            get(projects::handle_list_content),
        )
        .route(
            "/api/v1/projects/:id/reports",
            get(projects::handle_list_reports),
        )
        .route(
            "/api/v1/projects/:id/overview",
            get(projects::handle_domain_overview),
        )
        // Credit-gated backlink outreach
        .route("/api/v1/outreach", post(outreach::handle_request_outreach))
        .route("/api/v1/outreach/:id", get(outreach::handle_get_outreach))
        // Scoring previews (no persistence)
        .route(
            "/api/v1/intelligence/classify-intent",
            post(intelligence::handle_classify_intent),
        )
        .route(
            "/api/v1/intelligence/score-keyword",
            post(intelligence::handle_score_keyword),
        )
        .route(
            "/api/v1/intelligence/score-backlink",
            post(intelligence::handle_score_backlink),
        )
        .with_state(state)
}
