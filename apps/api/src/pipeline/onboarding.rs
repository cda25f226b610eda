//! Event-triggered flows: user signup, project creation, plan upgrades.

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::markup::{llms_txt, LlmsTxtPage};
use crate::models::project::ProjectRow;
use crate::models::user::UserRow;
use crate::notify::{Notification, Notifier};
use crate::pipeline::discovery::discover_competitor_keywords;
use crate::pipeline::plan::plan_features;
use crate::vendors::semrush::SemrushClient;

/// Welcome credits granted at signup.
pub const SIGNUP_BONUS: i64 = 100;

pub fn default_project_name(domain: &str) -> String {
    format!("{domain} SEO")
}

/// Renders the llms.txt document for a project's domain.
pub fn project_llms_txt(project: &ProjectRow, contact_email: Option<&str>) -> String {
    let pages = vec![
        LlmsTxtPage {
            title: "Home".to_string(),
            url: format!("https://{}", project.domain),
            description: "Homepage".to_string(),
        },
        LlmsTxtPage {
            title: "Blog".to_string(),
            url: format!("https://{}/blog", project.domain),
            description: "Latest articles".to_string(),
        },
    ];
    llms_txt(
        &project.name,
        &format!(
            "SEO-optimized content for {} powered by RankForge",
            project.domain
        ),
        &pages,
        None,
        contact_email,
    )
}

/// Signup flow: welcome notification, signup bonus credits, and a default
/// project when the user arrived with a domain. Returns the default
/// project's id when one was created.
pub async fn handle_user_created(
    pool: &PgPool,
    notifier: &Notifier,
    base_url: &str,
    user: &UserRow,
    signup_domain: Option<&str>,
) -> Result<Option<Uuid>> {
    let welcome = Notification::new(
        user.id,
        "Welcome to RankForge - Your AI SEO Assistant",
        format!("Hi {}! Connect a domain to start automating your SEO.", user.name),
    )
    .with_action("Get Started", format!("{base_url}/setup?user={}", user.id));
    if let Err(e) = notifier.send(pool, &welcome).await {
        warn!("Welcome notification failed for user {}: {e}", user.id);
    }

    let balance = user.credits + SIGNUP_BONUS;
    sqlx::query(
        r#"
        INSERT INTO credit_transactions (id, user_id, tx_type, amount, balance, reason, created_at)
        VALUES ($1, $2, 'bonus', $3, $4, $5, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(SIGNUP_BONUS)
    .bind(balance)
    .bind("Welcome bonus - share RankForge with others to earn backlinks!")
    .execute(pool)
    .await?;
    sqlx::query("UPDATE users SET credits = $1 WHERE id = $2")
        .bind(balance)
        .bind(user.id)
        .execute(pool)
        .await?;

    let Some(domain) = signup_domain.filter(|d| !d.trim().is_empty()) else {
        return Ok(None);
    };

    let project_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO projects
            (id, user_id, name, domain, target_market, status, competitor_domains,
             gsc_connected, created_at)
        VALUES ($1, $2, $3, $4, 'us', 'active', $5, FALSE, NOW())
        "#,
    )
    .bind(project_id)
    .bind(user.id)
    .bind(default_project_name(domain))
    .bind(domain)
    .bind(Vec::<String>::new())
    .execute(pool)
    .await?;

    info!("Created default project {project_id} for user {} ({domain})", user.id);
    Ok(Some(project_id))
}

/// Everything the project-created flow produced.
#[derive(Debug)]
pub struct ProjectSetup {
    pub keywords_found: i64,
    pub llms_txt: String,
}

/// Project-created flow: seed the backlog from competitors, render the
/// domain's llms.txt, and tell the user what was found.
pub async fn handle_project_created(
    pool: &PgPool,
    semrush: &SemrushClient,
    notifier: &Notifier,
    base_url: &str,
    project: &ProjectRow,
    contact_email: Option<&str>,
) -> Result<ProjectSetup> {
    if !project.competitor_domains.is_empty() {
        if let Err(e) = discover_competitor_keywords(pool, semrush, project).await {
            warn!("Competitor discovery failed for project {}: {e}", project.id);
        }
    }

    let llms = project_llms_txt(project, contact_email);

    let keywords_found: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM keywords WHERE project_id = $1")
            .bind(project.id)
            .fetch_one(pool)
            .await?;

    let notification = Notification::new(
        project.user_id,
        "Project Setup Complete",
        format!(
            "Found {keywords_found} potential keywords for {}",
            project.domain
        ),
    )
    .with_action(
        "View Keywords",
        format!("{base_url}/projects/{}/keywords", project.id),
    );
    if let Err(e) = notifier.send(pool, &notification).await {
        warn!("Project setup notification failed for project {}: {e}", project.id);
    }

    Ok(ProjectSetup {
        keywords_found,
        llms_txt: llms,
    })
}

/// Plan upgrade flow: persist the new plan and tell the user what it
/// unlocks.
pub async fn handle_plan_upgraded(
    pool: &PgPool,
    notifier: &Notifier,
    user_id: Uuid,
    new_plan: &str,
) -> Result<()> {
    sqlx::query("UPDATE users SET plan = $1 WHERE id = $2")
        .bind(new_plan)
        .bind(user_id)
        .execute(pool)
        .await?;

    let notification = Notification::new(
        user_id,
        format!("Welcome to RankForge {new_plan}!"),
        plan_features(new_plan).join(" · "),
    );
    if let Err(e) = notifier.send(pool, &notification).await {
        warn!("Plan upgrade notification failed for user {user_id}: {e}");
    }

    info!("User {user_id} upgraded to plan {new_plan}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(domain: &str, name: &str) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            domain: domain.to_string(),
            target_market: "us".to_string(),
            status: "active".to_string(),
            competitor_domains: vec![],
            gsc_site_url: None,
            gsc_connected: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_project_name() {
        assert_eq!(default_project_name("example.com"), "example.com SEO");
    }

    #[test]
    fn test_project_llms_txt_lists_home_and_blog() {
        let p = project("example.com", "example.com SEO");
        let txt = project_llms_txt(&p, Some("owner@example.com"));
        assert!(txt.starts_with("# example.com SEO"));
        assert!(txt.contains("- [Home](https://example.com): Homepage"));
        assert!(txt.contains("- [Blog](https://example.com/blog): Latest articles"));
        assert!(txt.contains("Email: owner@example.com"));
    }

    #[test]
    fn test_project_llms_txt_without_contact() {
        let p = project("example.com", "example.com SEO");
        assert!(!project_llms_txt(&p, None).contains("## Contact"));
    }
}
