use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::enrichment::classifier::IntentClassifier;
use crate::llm_client::LlmClient;
use crate::notify::Notifier;
use crate::vendors::ahrefs::AhrefsClient;
use crate::vendors::gsc::GscClient;
use crate::vendors::semrush::SemrushClient;

/// Shared application state injected into all route handlers via Axum
/// extractors, and cloned into the job scheduler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis client used for scheduler job locks.
    pub redis: RedisClient,
    pub llm: LlmClient,
    pub semrush: SemrushClient,
    pub ahrefs: AhrefsClient,
    pub gsc: GscClient,
    pub notifier: Notifier,
    pub config: Config,
    /// Pluggable intent classifier. Default: lexical. Swap via ENABLE_LLM_INTENT.
    pub intent_classifier: Arc<dyn IntentClassifier>,
}
