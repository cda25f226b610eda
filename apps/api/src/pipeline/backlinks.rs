//! Backlink monitoring — the recurring sync that discovers new links,
//! scores them, pays out reward credits, and flags lost links.
//!
//! Anchor and context relevance are estimated lexically from the project's
//! keyword backlog (substring overlap, the same shape as the content
//! selector's relevance scoring) so quality scoring stays deterministic —
//! no extra vendor calls per link.

use std::collections::HashSet;

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intelligence::backlink_quality::{
    validate_backlink_quality, BacklinkQuality, BacklinkSignal, LinkType,
};
use crate::intelligence::sanitize::clamp_signal;
use crate::models::backlink::BacklinkRow;
use crate::models::project::ProjectRow;
use crate::notify::{Notification, Notifier};
use crate::state::AppState;
use crate::vendors::ahrefs::{AhrefsClient, BacklinkData, BacklinkStatus, TargetMode};

/// Links fetched per sync.
const SYNC_FETCH_LIMIT: u32 = 100;
/// Keyword phrases sampled for relevance estimation.
const RELEVANCE_KEYWORD_SAMPLE: i64 = 200;
/// Minimum domain rating for a credit-earning link.
const CREDIT_DR_FLOOR: f64 = 30.0;
/// Credit payout cap per link.
const CREDIT_CAP: i64 = 100;
/// Relevance when there is nothing to compare against.
const NEUTRAL_RELEVANCE: f64 = 50.0;

/// Fraction of project keywords the anchor text covers, as 0–100.
/// No keywords or empty anchor → neutral midpoint.
pub fn estimate_anchor_relevance(anchor_text: &str, keywords: &[String]) -> f64 {
    overlap_relevance(anchor_text, keywords)
}

/// Fraction of project keywords the target URL's slug covers, as 0–100.
/// The slug is the last path segment with hyphens respaced.
pub fn estimate_context_relevance(target_url: &str, keywords: &[String]) -> f64 {
    // Path only — a bare domain has no slug to judge.
    let without_scheme = target_url.split("://").nth(1).unwrap_or(target_url);
    let path = without_scheme
        .split_once('/')
        .map(|(_, path)| path)
        .unwrap_or("");
    let slug_text = path
        .split('?')
        .next()
        .unwrap_or("")
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .replace('-', " ");
    overlap_relevance(&slug_text, keywords)
}

fn overlap_relevance(text: &str, keywords: &[String]) -> f64 {
    let text = text.to_lowercase();
    if text.trim().is_empty() || keywords.is_empty() {
        return NEUTRAL_RELEVANCE;
    }
    let matched = keywords
        .iter()
        .filter(|kw| {
            let kw = kw.to_lowercase();
            !kw.is_empty() && (text.contains(&kw) || kw.contains(text.trim()))
        })
        .count();
    (matched as f64 / keywords.len() as f64) * 100.0
}

/// Scores a fetched link against the project's keyword backlog.
pub fn score_backlink(link: &BacklinkData, keywords: &[String]) -> BacklinkQuality {
    let signal = BacklinkSignal {
        domain_rating: link.domain_rating,
        link_type: link.link_type,
        anchor_relevance: estimate_anchor_relevance(&link.anchor_text, keywords),
        context_relevance: estimate_context_relevance(&link.target_url, keywords),
    };
    validate_backlink_quality(&clamp_signal(&signal))
}

/// Credit payout for a newly discovered link: dofollow links from DR ≥ 30
/// domains earn `min(floor(DR), 100)` credits. Everything else earns none.
pub fn credit_award(domain_rating: f64, link_type: LinkType) -> Option<i64> {
    if link_type == LinkType::Dofollow && domain_rating >= CREDIT_DR_FLOOR {
        Some((domain_rating.floor() as i64).min(CREDIT_CAP))
    } else {
        None
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub new_links: u64,
    pub lost_links: u64,
    pub credits_awarded: i64,
}

/// Syncs one project's backlink profile: inserts and scores new links,
/// pays credits, marks vanished links lost. Per-link isolation.
pub async fn sync_project_backlinks(
    pool: &PgPool,
    ahrefs: &AhrefsClient,
    notifier: &Notifier,
    project: &ProjectRow,
) -> Result<SyncOutcome> {
    let fetched = ahrefs
        .backlinks(&project.domain, TargetMode::Domain, SYNC_FETCH_LIMIT)
        .await
        .map_err(|e| anyhow::anyhow!("Backlink fetch failed for {}: {e}", project.domain))?;

    let keywords: Vec<String> =
        sqlx::query_scalar("SELECT keyword FROM keywords WHERE project_id = $1 LIMIT $2")
            .bind(project.id)
            .bind(RELEVANCE_KEYWORD_SAMPLE)
            .fetch_all(pool)
            .await?;

    let mut outcome = SyncOutcome::default();

    for link in &fetched {
        // Links the vendor already reports as lost are not new discoveries.
        if link.status == BacklinkStatus::Lost {
            continue;
        }
        match record_new_backlink(pool, notifier, project, link, &keywords).await {
            Ok(Some(credits)) => {
                outcome.new_links += 1;
                outcome.credits_awarded += credits;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to record backlink {}: {e}", link.source_url),
        }
    }

    // Active rows missing from the fetch have been removed upstream.
    let fetched_urls: HashSet<&str> = fetched
        .iter()
        .filter(|l| l.status == BacklinkStatus::Active)
        .map(|l| l.source_url.as_str())
        .collect();
    let active: Vec<BacklinkRow> =
        sqlx::query_as("SELECT * FROM backlinks WHERE project_id = $1 AND status = 'active'")
            .bind(project.id)
            .fetch_all(pool)
            .await?;

    for existing in &active {
        if fetched_urls.contains(existing.source_url.as_str()) {
            continue;
        }
        // The vendor index lags; probe the source page before declaring the
        // link dead.
        if ahrefs
            .verify_backlink(&existing.source_url, &existing.target_url)
            .await
        {
            continue;
        }
        if let Err(e) = mark_backlink_lost(pool, notifier, project, existing).await {
            warn!("Failed to mark backlink {} lost: {e}", existing.id);
        } else {
            outcome.lost_links += 1;
        }
    }

    info!(
        "Backlink sync for project {}: {} new, {} lost, {} credits",
        project.id, outcome.new_links, outcome.lost_links, outcome.credits_awarded
    );
    Ok(outcome)
}

/// Inserts a fetched link if unseen. Returns `Some(credits_awarded)` for a
/// newly recorded link (zero when it earns nothing), `None` when already
/// known.
async fn record_new_backlink(
    pool: &PgPool,
    notifier: &Notifier,
    project: &ProjectRow,
    link: &BacklinkData,
    keywords: &[String],
) -> Result<Option<i64>> {
    let exists: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM backlinks WHERE project_id = $1 AND source_url = $2")
            .bind(project.id)
            .bind(&link.source_url)
            .fetch_optional(pool)
            .await?;
    if exists.is_some() {
        return Ok(None);
    }

    let quality = score_backlink(link, keywords);
    let backlink_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO backlinks
            (id, project_id, source_url, source_domain, target_url, anchor_text,
             domain_rating, link_type, quality_score, quality_tier, status,
             discovered_at, last_checked)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', NOW(), NOW())
        "#,
    )
    .bind(backlink_id)
    .bind(project.id)
    .bind(&link.source_url)
    .bind(&link.source_domain)
    .bind(&link.target_url)
    .bind(&link.anchor_text)
    .bind(link.domain_rating)
    .bind(link.link_type.as_str())
    .bind(quality.score as i16)
    .bind(quality.quality.as_str())
    .execute(pool)
    .await?;

    let Some(credits) = credit_award(link.domain_rating, link.link_type) else {
        return Ok(Some(0));
    };

    let current: i64 = sqlx::query_scalar("SELECT credits FROM users WHERE id = $1")
        .bind(project.user_id)
        .fetch_one(pool)
        .await?;
    let balance = current + credits;

    sqlx::query(
        r#"
        INSERT INTO credit_transactions
            (id, user_id, tx_type, amount, balance, reason, related_backlink_id, created_at)
        VALUES ($1, $2, 'earned', $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project.user_id)
    .bind(credits)
    .bind(balance)
    .bind(format!(
        "Quality backlink from {} (DR {:.0})",
        link.source_domain, link.domain_rating
    ))
    .bind(backlink_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "UPDATE users SET credits = $1, backlinks_earned = backlinks_earned + 1 WHERE id = $2",
    )
    .bind(balance)
    .bind(project.user_id)
    .execute(pool)
    .await?;

    let notification = Notification::new(
        project.user_id,
        "New Backlink + Credits Earned!",
        format!(
            "{} linked to you. Earned {credits} credits!",
            link.source_domain
        ),
    )
    .with_action(
        "View Backlink",
        format!("https://rankforge.app/projects/{}/backlinks", project.id),
    );
    if let Err(e) = notifier.send(pool, &notification).await {
        warn!("Backlink reward notification failed: {e}");
    }

    Ok(Some(credits))
}

async fn mark_backlink_lost(
    pool: &PgPool,
    notifier: &Notifier,
    project: &ProjectRow,
    backlink: &BacklinkRow,
) -> Result<()> {
    sqlx::query("UPDATE backlinks SET status = 'lost', last_checked = NOW() WHERE id = $1")
        .bind(backlink.id)
        .execute(pool)
        .await?;

    let notification = Notification::new(
        project.user_id,
        "Backlink Lost",
        format!("{} removed their link", backlink.source_domain),
    )
    .with_action(
        "View Details",
        format!(
            "https://rankforge.app/projects/{}/backlinks/{}",
            project.id, backlink.id
        ),
    );
    if let Err(e) = notifier.send(pool, &notification).await {
        warn!("Lost-backlink notification failed: {e}");
    }
    Ok(())
}

/// Backlink sync job body. Per-project isolation.
pub async fn run_backlink_sync(state: &AppState) {
    let projects: Vec<ProjectRow> =
        match sqlx::query_as("SELECT * FROM projects WHERE status = 'active'")
            .fetch_all(&state.db)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!("Backlink sync could not list projects: {e}");
                return;
            }
        };

    for project in &projects {
        if let Err(e) =
            sync_project_backlinks(&state.db, &state.ahrefs, &state.notifier, project).await
        {
            warn!("Backlink sync failed for project {}: {e}", project.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::backlink_quality::QualityTier;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn link(dr: f64, link_type: LinkType, anchor: &str, target: &str) -> BacklinkData {
        BacklinkData {
            source_url: "https://blog.example.com/post".to_string(),
            source_domain: "blog.example.com".to_string(),
            target_url: target.to_string(),
            anchor_text: anchor.to_string(),
            domain_rating: dr,
            url_rating: 10.0,
            link_type,
            first_seen: String::new(),
            last_checked: String::new(),
            status: BacklinkStatus::Active,
        }
    }

    #[test]
    fn test_anchor_relevance_counts_covered_keywords() {
        let kws = keywords(&["crm software", "pipeline tool"]);
        assert_eq!(estimate_anchor_relevance("the best crm software around", &kws), 50.0);
        assert_eq!(estimate_anchor_relevance("unrelated anchor", &kws), 0.0);
    }

    #[test]
    fn test_anchor_relevance_neutral_without_signal() {
        assert_eq!(estimate_anchor_relevance("", &keywords(&["a"])), NEUTRAL_RELEVANCE);
        assert_eq!(estimate_anchor_relevance("anchor", &[]), NEUTRAL_RELEVANCE);
    }

    #[test]
    fn test_context_relevance_reads_target_slug() {
        let kws = keywords(&["crm software"]);
        assert_eq!(
            estimate_context_relevance("https://t.io/blog/best-crm-software-2026", &kws),
            100.0
        );
        assert_eq!(
            estimate_context_relevance("https://t.io/blog/gardening-tips?ref=x", &kws),
            0.0
        );
    }

    #[test]
    fn test_context_relevance_homepage_is_neutral() {
        // Bare domain has no slug to judge
        assert_eq!(
            estimate_context_relevance("https://t.io/", &keywords(&["crm"])),
            NEUTRAL_RELEVANCE
        );
    }

    #[test]
    fn test_score_backlink_strong_link() {
        let kws = keywords(&["crm software"]);
        let l = link(
            80.0,
            LinkType::Dofollow,
            "great crm software",
            "https://t.io/blog/crm-software-guide",
        );
        // dr 32 + dofollow 20 + anchor 20 + context 20 = 92
        let q = score_backlink(&l, &kws);
        assert_eq!(q.score, 92);
        assert_eq!(q.quality, QualityTier::Excellent);
    }

    #[test]
    fn test_credit_award_rules() {
        assert_eq!(credit_award(30.0, LinkType::Dofollow), Some(30));
        assert_eq!(credit_award(71.6, LinkType::Dofollow), Some(71));
        assert_eq!(credit_award(100.0, LinkType::Dofollow), Some(100));
        assert_eq!(credit_award(29.9, LinkType::Dofollow), None);
        assert_eq!(credit_award(95.0, LinkType::Nofollow), None);
        assert_eq!(credit_award(95.0, LinkType::Sponsored), None);
    }
}
