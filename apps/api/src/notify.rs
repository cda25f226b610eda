//! Notifier — persists user notifications and optionally pushes them to the
//! user's Slack webhook.
//!
//! Delivery is best-effort: the row insert is the source of truth, the
//! Slack push is fire-and-forget. Email delivery is owned by an external
//! mailer that reads the notifications table.

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

/// A notification to deliver to one user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub action_label: Option<String>,
    pub action_url: Option<String>,
}

impl Notification {
    pub fn new(user_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notification {
            user_id,
            title: title.into(),
            message: message.into(),
            action_label: None,
            action_url: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self.action_url = Some(url.into());
        self
    }

    /// Single-line rendering used for Slack pushes.
    pub fn render_line(&self) -> String {
        match &self.action_url {
            Some(url) => format!("*{}* — {} ({url})", self.title, self.message),
            None => format!("*{}* — {}", self.title, self.message),
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier {
            client: reqwest::Client::new(),
        }
    }

    /// Persists the notification and pushes it to the user's Slack webhook
    /// when one is configured. The insert failing is an error; the push
    /// failing is only a warning.
    pub async fn send(&self, pool: &PgPool, notification: &Notification) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message, action_label, action_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.action_label)
        .bind(&notification.action_url)
        .execute(pool)
        .await?;

        info!(
            "Notification {} for user {}: {}",
            id, notification.user_id, notification.title
        );

        let webhook: Option<String> =
            sqlx::query_scalar("SELECT slack_webhook FROM users WHERE id = $1")
                .bind(notification.user_id)
                .fetch_optional(pool)
                .await?
                .flatten();

        if let Some(webhook) = webhook {
            let payload = serde_json::json!({ "text": notification.render_line() });
            if let Err(e) = self.client.post(&webhook).json(&payload).send().await {
                warn!("Slack push failed for user {}: {e}", notification.user_id);
            }
        }

        Ok(id)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line_without_action() {
        let n = Notification::new(Uuid::new_v4(), "Backlink Lost", "example.org removed their link");
        assert_eq!(n.render_line(), "*Backlink Lost* — example.org removed their link");
    }

    #[test]
    fn test_render_line_with_action_appends_url() {
        let n = Notification::new(Uuid::new_v4(), "New Content", "Published guide")
            .with_action("View", "https://rankforge.app/content/1");
        assert!(n.render_line().ends_with("(https://rankforge.app/content/1)"));
        assert_eq!(n.action_label.as_deref(), Some("View"));
    }
}
