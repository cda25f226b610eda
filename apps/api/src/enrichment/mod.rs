//! AI enrichment — the prompt helpers around the LLM client.
//!
//! Every helper degrades predictably: structured replies that fail to parse
//! fall back to a neutral value instead of erroring, because these run
//! inside batch pipelines where a mangled LLM reply must not abort the run.
//! Transport failures still surface as errors so callers can decide.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod classifier;
pub mod prompts;

use crate::errors::AppError;
use crate::intelligence::intent::IntentLabel;
use crate::llm_client::{
    LlmClient, LlmError, TOKENS_ARTICLE, TOKENS_ONE_WORD, TOKENS_SHORT, TOKENS_STRUCTURED,
};

/// Classifies intent via the LLM. Unrecognized replies fall back to
/// `Informational`; transport errors propagate (the classifier backend
/// falls back to the lexical result on those).
pub async fn classify_intent_llm(
    llm: &LlmClient,
    keyword: &str,
) -> Result<IntentLabel, AppError> {
    let prompt = prompts::INTENT_PROMPT_TEMPLATE.replace("{keyword}", keyword);
    let reply = llm
        .call_text(&prompt, prompts::INTENT_SYSTEM, TOKENS_ONE_WORD)
        .await
        .map_err(|e| AppError::Llm(format!("Intent classification failed: {e}")))?;

    Ok(IntentLabel::parse(&reply).unwrap_or_else(|| {
        warn!("LLM intent reply {reply:?} not a known label, defaulting to informational");
        IntentLabel::Informational
    }))
}

/// Groups keywords into semantic clusters. A reply that is not valid JSON
/// collapses everything into a single "unclustered" bucket.
pub async fn cluster_keywords(
    llm: &LlmClient,
    keywords: &[String],
) -> Result<HashMap<String, Vec<String>>, AppError> {
    let prompt = prompts::CLUSTER_PROMPT_TEMPLATE.replace("{keywords}", &keywords.join("\n"));
    match llm
        .call_json::<HashMap<String, Vec<String>>>(
            &prompt,
            crate::llm_client::prompts::JSON_ONLY_SYSTEM,
            TOKENS_STRUCTURED,
        )
        .await
    {
        Ok(clusters) => Ok(clusters),
        Err(LlmError::Parse(e)) => {
            warn!("Cluster reply was not valid JSON ({e}), returning unclustered");
            Ok(HashMap::from([("unclustered".to_string(), keywords.to_vec())]))
        }
        Err(e) => Err(AppError::Llm(format!("Keyword clustering failed: {e}"))),
    }
}

/// Generates a content brief for a primary keyword and its satellites.
pub async fn generate_content_brief(
    llm: &LlmClient,
    primary_keyword: &str,
    related_keywords: &[String],
    intent: IntentLabel,
) -> Result<String, AppError> {
    let prompt = prompts::BRIEF_PROMPT_TEMPLATE
        .replace("{primary_keyword}", primary_keyword)
        .replace("{related_keywords}", &related_keywords.join(", "))
        .replace("{intent}", intent.as_str());
    llm.call_text(&prompt, prompts::BRIEF_SYSTEM, TOKENS_STRUCTURED)
        .await
        .map_err(|e| AppError::Llm(format!("Content brief generation failed: {e}")))
}

/// Generates a full markdown article from a brief.
/// `how_to` switches the requested shape from article to step-by-step guide.
pub async fn generate_article(
    llm: &LlmClient,
    keyword: &str,
    brief: &str,
    how_to: bool,
) -> Result<String, AppError> {
    let content_kind = if how_to { "how-to guide" } else { "article" };
    let prompt = prompts::ARTICLE_PROMPT_TEMPLATE
        .replace("{content_kind}", content_kind)
        .replace("{keyword}", keyword)
        .replace("{brief}", brief);
    llm.call_text(&prompt, prompts::ARTICLE_SYSTEM, TOKENS_ARTICLE)
        .await
        .map_err(|e| AppError::Llm(format!("Article generation failed: {e}")))
}

/// Generates a CTR-optimized meta description.
pub async fn generate_meta_description(
    llm: &LlmClient,
    title: &str,
    keyword: &str,
    content_summary: &str,
) -> Result<String, AppError> {
    let prompt = prompts::META_DESCRIPTION_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{keyword}", keyword)
        .replace("{summary}", content_summary);
    llm.call_text(&prompt, prompts::BRIEF_SYSTEM, TOKENS_SHORT)
        .await
        .map_err(|e| AppError::Llm(format!("Meta description generation failed: {e}")))
}

/// Executive summary + recommendations for a metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl ReportSummary {
    /// Neutral placeholder used when the LLM reply cannot be parsed.
    pub fn unavailable() -> Self {
        ReportSummary {
            summary: "Unable to generate summary".to_string(),
            recommendations: vec![],
        }
    }
}

/// Summarizes a period's metrics. Parse failures degrade to the placeholder
/// so the weekly report still goes out with raw numbers.
pub async fn generate_report_summary(
    llm: &LlmClient,
    metrics: &serde_json::Value,
    period: &str,
) -> Result<ReportSummary, AppError> {
    let metrics_json = serde_json::to_string_pretty(metrics)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize metrics: {e}")))?;
    let prompt = prompts::REPORT_SUMMARY_PROMPT_TEMPLATE
        .replace("{metrics_json}", &metrics_json)
        .replace("{period}", period);

    match llm
        .call_json::<ReportSummary>(
            &prompt,
            crate::llm_client::prompts::JSON_ONLY_SYSTEM,
            TOKENS_SHORT,
        )
        .await
    {
        Ok(summary) => Ok(summary),
        Err(LlmError::Parse(e)) => {
            warn!("Report summary reply was not valid JSON ({e}), using placeholder");
            Ok(ReportSummary::unavailable())
        }
        Err(e) => Err(AppError::Llm(format!("Report summary failed: {e}"))),
    }
}

/// Drafts a backlink outreach email offering platform credits.
pub async fn draft_outreach_email(
    llm: &LlmClient,
    our_domain: &str,
    target_domain: &str,
    credits_offered: i64,
) -> Result<String, AppError> {
    let prompt = prompts::OUTREACH_PROMPT_TEMPLATE
        .replace("{target_domain}", target_domain)
        .replace("{our_domain}", our_domain)
        .replace("{credits}", &credits_offered.to_string());
    llm.call_text(&prompt, prompts::BRIEF_SYSTEM, TOKENS_SHORT)
        .await
        .map_err(|e| AppError::Llm(format!("Outreach draft failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary_deserializes_expected_shape() {
        let json = r#"{
            "summary": "Traffic grew 12% week over week.",
            "recommendations": ["Refresh the top guide", "Target 3 quick-win keywords"]
        }"#;
        let parsed: ReportSummary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.recommendations.len(), 2);
        assert!(parsed.summary.contains("12%"));
    }

    #[test]
    fn test_report_summary_placeholder_is_empty_but_sendable() {
        let fallback = ReportSummary::unavailable();
        assert!(!fallback.summary.is_empty());
        assert!(fallback.recommendations.is_empty());
    }

    #[test]
    fn test_intent_prompt_embeds_keyword() {
        let prompt = prompts::INTENT_PROMPT_TEMPLATE.replace("{keyword}", "best crm");
        assert!(prompt.contains("\"best crm\""));
        assert!(!prompt.contains("{keyword}"));
    }

    #[test]
    fn test_article_prompt_switches_kind_for_how_to() {
        let article = prompts::ARTICLE_PROMPT_TEMPLATE
            .replace("{content_kind}", "article")
            .replace("{keyword}", "x")
            .replace("{brief}", "y");
        let guide = prompts::ARTICLE_PROMPT_TEMPLATE
            .replace("{content_kind}", "how-to guide")
            .replace("{keyword}", "x")
            .replace("{brief}", "y");
        assert!(article.contains("SEO-optimized article about"));
        assert!(guide.contains("SEO-optimized how-to guide about"));
    }
}
