use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Credentials are read here exactly once and injected into the vendor and
/// LLM clients as constructor parameters — no client reads ambient process
/// state, so tests can construct clients with doubles.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub semrush_api_key: String,
    pub ahrefs_api_key: String,
    pub google_access_token: String,
    pub anthropic_api_key: String,
    /// Base URL used in notification action links, e.g. "https://rankforge.app".
    pub app_base_url: String,
    /// Swaps the lexical intent classifier for the LLM-backed one.
    pub enable_llm_intent: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            semrush_api_key: require_env("SEMRUSH_API_KEY")?,
            ahrefs_api_key: require_env("AHREFS_API_KEY")?,
            google_access_token: require_env("GOOGLE_ACCESS_TOKEN")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "https://rankforge.app".to_string()),
            enable_llm_intent: std::env::var("ENABLE_LLM_INTENT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
