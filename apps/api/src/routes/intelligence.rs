//! Axum route handlers for scoring previews — the intelligence engine
//! exposed directly, nothing persisted.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::intelligence::backlink_quality::{validate_backlink_quality, BacklinkQuality, BacklinkSignal};
use crate::intelligence::intent::IntentLabel;
use crate::intelligence::priority::{calculate_priority, KeywordMetrics};
use crate::intelligence::sanitize::{validate_metrics, validate_signal};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyIntentRequest {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyIntentResponse {
    pub keyword: String,
    pub intent: IntentLabel,
    /// Which backend produced the label ("lexical" | "llm").
    pub backend: &'static str,
}

/// POST /api/v1/intelligence/classify-intent
pub async fn handle_classify_intent(
    State(state): State<AppState>,
    Json(request): Json<ClassifyIntentRequest>,
) -> Result<Json<ClassifyIntentResponse>, AppError> {
    if request.keyword.trim().is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }
    let intent = state.intent_classifier.classify(&request.keyword).await;
    Ok(Json(ClassifyIntentResponse {
        keyword: request.keyword,
        intent,
        backend: state.intent_classifier.backend(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ScoreKeywordResponse {
    pub priority: u8,
}

/// POST /api/v1/intelligence/score-keyword
///
/// Body is the raw metrics record. Out-of-domain numerics are rejected
/// here — the scoring core itself never validates.
pub async fn handle_score_keyword(
    Json(metrics): Json<KeywordMetrics>,
) -> Result<Json<ScoreKeywordResponse>, AppError> {
    validate_metrics(&metrics).map_err(AppError::Validation)?;
    Ok(Json(ScoreKeywordResponse {
        priority: calculate_priority(&metrics),
    }))
}

/// POST /api/v1/intelligence/score-backlink
pub async fn handle_score_backlink(
    Json(signal): Json<BacklinkSignal>,
) -> Result<Json<BacklinkQuality>, AppError> {
    validate_signal(&signal).map_err(AppError::Validation)?;
    Ok(Json(validate_backlink_quality(&signal)))
}
