//! Vendor API clients for the three external SEO data providers.
//!
//! Every client owns its `reqwest::Client` and receives its credential as a
//! constructor parameter — nothing in this module reads environment state.
//! Transient upstream failures (429, 5xx) are retried with the same capped
//! exponential backoff the LLM client uses.

use reqwest::{RequestBuilder, Response};
use thiserror::Error;
use tracing::warn;

pub mod ahrefs;
pub mod gsc;
pub mod semrush;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed vendor response: {0}")]
    Malformed(String),
}

/// Sends a request, retrying 429 and 5xx responses with exponential backoff.
/// Other non-success statuses fail immediately with the response body as the
/// error message.
pub(crate) async fn send_with_retry(
    build: impl Fn() -> RequestBuilder,
    vendor: &str,
) -> Result<Response, VendorError> {
    let mut last_error: Option<VendorError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "{vendor} call attempt {attempt} failed, retrying after {}ms...",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(VendorError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{vendor} API returned {status}: {body}");
            last_error = Some(VendorError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VendorError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(VendorError::Api {
        status: 429,
        message: format!("{vendor} still rate-limited after {MAX_RETRIES} retries"),
    }))
}
