//! Intent classification backends — pluggable, trait-based.
//!
//! Default: `LexicalIntentClassifier` (pure, fast, deterministic).
//! Optional: `LlmIntentClassifier` (semantic, can produce `navigational`),
//! swapped at startup via ENABLE_LLM_INTENT.
//!
//! `AppState` holds an `Arc<dyn IntentClassifier>`. The lexical rules are
//! authoritative whenever the LLM path errors, so classification is total
//! regardless of backend.

use async_trait::async_trait;
use tracing::warn;

use crate::enrichment::classify_intent_llm;
use crate::intelligence::intent::{classify_intent, IntentLabel};
use crate::llm_client::LlmClient;

/// The intent classifier trait. Implement this to swap backends without
/// touching handler or pipeline code.
///
/// Classification is infallible by contract — backends must fall back
/// rather than fail.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, keyword: &str) -> IntentLabel;

    /// Backend name, surfaced in scoring-preview responses for transparency.
    fn backend(&self) -> &'static str;
}

/// Pure lexical classifier. No LLM call, never `navigational`.
pub struct LexicalIntentClassifier;

#[async_trait]
impl IntentClassifier for LexicalIntentClassifier {
    async fn classify(&self, keyword: &str) -> IntentLabel {
        classify_intent(keyword)
    }

    fn backend(&self) -> &'static str {
        "lexical"
    }
}

/// Semantic classifier via the LLM. Any LLM failure falls back to the
/// lexical result — the two backends can disagree, and on error the
/// lexical rules win.
pub struct LlmIntentClassifier(pub LlmClient);

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, keyword: &str) -> IntentLabel {
        match classify_intent_llm(&self.0, keyword).await {
            Ok(label) => label,
            Err(e) => {
                warn!("LLM intent classification failed ({e}), falling back to lexical");
                classify_intent(keyword)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lexical_backend_matches_pure_function() {
        let backend = LexicalIntentClassifier;
        for kw in ["buy shoes online", "best running shoes", "how to tie laces"] {
            assert_eq!(backend.classify(kw).await, classify_intent(kw), "keyword: {kw}");
        }
    }

    #[test]
    fn test_backend_labels() {
        assert_eq!(LexicalIntentClassifier.backend(), "lexical");
        assert_eq!(
            LlmIntentClassifier(LlmClient::new("test-key".to_string())).backend(),
            "llm"
        );
    }
}
