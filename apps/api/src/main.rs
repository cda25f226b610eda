mod config;
mod db;
mod enrichment;
mod errors;
mod intelligence;
mod jobs;
mod llm_client;
mod markup;
mod models;
mod notify;
mod pipeline;
mod routes;
mod state;
mod vendors;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::enrichment::classifier::{
    IntentClassifier, LexicalIntentClassifier, LlmIntentClassifier,
};
use crate::llm_client::LlmClient;
use crate::notify::Notifier;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vendors::ahrefs::AhrefsClient;
use crate::vendors::gsc::GscClient;
use crate::vendors::semrush::SemrushClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RankForge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (job locks)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize vendor clients (credentials injected, never read ambiently)
    let semrush = SemrushClient::new(config.semrush_api_key.clone());
    let ahrefs = AhrefsClient::new(config.ahrefs_api_key.clone());
    let gsc = GscClient::new(config.google_access_token.clone());
    info!("Vendor API clients initialized");

    // Intent classifier: lexical by default, LLM-backed via ENABLE_LLM_INTENT
    let intent_classifier: Arc<dyn IntentClassifier> = if config.enable_llm_intent {
        Arc::new(LlmIntentClassifier(llm.clone()))
    } else {
        Arc::new(LexicalIntentClassifier)
    };
    info!("Intent classifier backend: {}", intent_classifier.backend());

    // Build app state
    let state = AppState {
        db,
        redis,
        llm,
        semrush,
        ahrefs,
        gsc,
        notifier: Notifier::new(),
        config: config.clone(),
        intent_classifier,
    };

    // Start the recurring-job scheduler
    let _scheduler = jobs::scheduler::spawn(state.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
