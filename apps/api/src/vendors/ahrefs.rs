//! Ahrefs client — backlink profiles and domain authority metrics.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intelligence::backlink_quality::LinkType;
use crate::vendors::{send_with_retry, VendorError};

const BACKLINKS_URL: &str = "https://api.ahrefs.com/v3/site-explorer/backlinks";
const METRICS_URL: &str = "https://api.ahrefs.com/v3/site-explorer/metrics";

/// Target scoping for backlink queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    Exact,
    Domain,
    Subdomains,
}

impl TargetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetMode::Exact => "exact",
            TargetMode::Domain => "domain",
            TargetMode::Subdomains => "subdomains",
        }
    }
}

/// Whether the link was present at the vendor's last crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BacklinkStatus {
    Active,
    Lost,
}

/// One backlink row, normalized from the vendor wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacklinkData {
    pub source_url: String,
    pub source_domain: String,
    pub target_url: String,
    pub anchor_text: String,
    pub domain_rating: f64,
    pub url_rating: f64,
    pub link_type: LinkType,
    pub first_seen: String,
    pub last_checked: String,
    pub status: BacklinkStatus,
}

/// Domain authority metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainMetrics {
    pub domain: String,
    pub domain_rating: f64,
    pub url_rating: f64,
    pub backlinks: u64,
    pub referring_domains: u64,
    pub organic_traffic: u64,
    pub organic_keywords: u64,
}

// Wire-format shapes.

#[derive(Debug, Deserialize)]
struct BacklinksResponse {
    backlinks: Vec<WireBacklink>,
}

#[derive(Debug, Deserialize)]
struct WireBacklink {
    url_from: String,
    domain_from: String,
    url_to: String,
    #[serde(default)]
    anchor: String,
    #[serde(default)]
    domain_rating: f64,
    #[serde(default)]
    url_rating: f64,
    #[serde(default)]
    is_dofollow: bool,
    #[serde(default)]
    first_seen: String,
    #[serde(default)]
    last_check: String,
    #[serde(default)]
    is_lost: bool,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    metrics: WireMetrics,
}

#[derive(Debug, Deserialize)]
struct WireMetrics {
    #[serde(default)]
    domain_rating: f64,
    #[serde(default)]
    url_rating: f64,
    #[serde(default)]
    backlinks: u64,
    #[serde(default)]
    refdomains: u64,
    #[serde(default)]
    traffic: u64,
    #[serde(default)]
    keywords: u64,
}

impl From<WireBacklink> for BacklinkData {
    fn from(wire: WireBacklink) -> Self {
        BacklinkData {
            source_url: wire.url_from,
            source_domain: wire.domain_from,
            target_url: wire.url_to,
            anchor_text: wire.anchor,
            domain_rating: wire.domain_rating,
            url_rating: wire.url_rating,
            // The vendor only distinguishes dofollow; rel sub-types are not
            // exposed on this endpoint.
            link_type: if wire.is_dofollow {
                LinkType::Dofollow
            } else {
                LinkType::Nofollow
            },
            first_seen: wire.first_seen,
            last_checked: wire.last_check,
            status: if wire.is_lost {
                BacklinkStatus::Lost
            } else {
                BacklinkStatus::Active
            },
        }
    }
}

#[derive(Clone)]
pub struct AhrefsClient {
    client: reqwest::Client,
    api_key: String,
}

impl AhrefsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Current backlink profile for a target.
    pub async fn backlinks(
        &self,
        target: &str,
        mode: TargetMode,
        limit: u32,
    ) -> Result<Vec<BacklinkData>, VendorError> {
        let limit = limit.to_string();
        let response = send_with_retry(
            || {
                self.client
                    .get(BACKLINKS_URL)
                    .bearer_auth(&self.api_key)
                    .query(&[
                        ("target", target),
                        ("mode", mode.as_str()),
                        ("limit", limit.as_str()),
                    ])
            },
            "Ahrefs",
        )
        .await?;

        let parsed: BacklinksResponse = response.json().await?;
        let links: Vec<BacklinkData> = parsed.backlinks.into_iter().map(Into::into).collect();
        debug!("Ahrefs backlinks({target}): {} links", links.len());
        Ok(links)
    }

    /// Domain rating, referring domains, and organic metrics for a target.
    pub async fn domain_metrics(&self, target: &str) -> Result<DomainMetrics, VendorError> {
        let response = send_with_retry(
            || {
                self.client
                    .get(METRICS_URL)
                    .bearer_auth(&self.api_key)
                    .query(&[("target", target), ("mode", TargetMode::Domain.as_str())])
            },
            "Ahrefs",
        )
        .await?;

        let parsed: MetricsResponse = response.json().await?;
        Ok(DomainMetrics {
            domain: target.to_string(),
            domain_rating: parsed.metrics.domain_rating,
            url_rating: parsed.metrics.url_rating,
            backlinks: parsed.metrics.backlinks,
            referring_domains: parsed.metrics.refdomains,
            organic_traffic: parsed.metrics.traffic,
            organic_keywords: parsed.metrics.keywords,
        })
    }

    /// Checks whether the source page still links to the target URL.
    /// Any fetch failure counts as "not verified" rather than an error —
    /// liveness probes run inside batch loops that must not abort.
    pub async fn verify_backlink(&self, source_url: &str, target_url: &str) -> bool {
        match self.client.get(source_url).send().await {
            Ok(response) => match response.text().await {
                Ok(html) => html.contains(target_url),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_backlink_maps_dofollow_flag() {
        let json = r#"{
            "backlinks": [
                {
                    "url_from": "https://blog.example.com/post",
                    "domain_from": "blog.example.com",
                    "url_to": "https://target.io/",
                    "anchor": "great tool",
                    "domain_rating": 71.5,
                    "url_rating": 34.0,
                    "is_dofollow": true,
                    "first_seen": "2026-01-03",
                    "last_check": "2026-08-01",
                    "is_lost": false
                },
                {
                    "url_from": "https://forum.example.org/t/1",
                    "domain_from": "forum.example.org",
                    "url_to": "https://target.io/pricing",
                    "anchor": "this",
                    "is_dofollow": false,
                    "is_lost": true
                }
            ]
        }"#;
        let parsed: BacklinksResponse = serde_json::from_str(json).unwrap();
        let links: Vec<BacklinkData> = parsed.backlinks.into_iter().map(Into::into).collect();

        assert_eq!(links[0].link_type, LinkType::Dofollow);
        assert_eq!(links[0].status, BacklinkStatus::Active);
        assert!((links[0].domain_rating - 71.5).abs() < f64::EPSILON);

        assert_eq!(links[1].link_type, LinkType::Nofollow);
        assert_eq!(links[1].status, BacklinkStatus::Lost);
        // Missing numeric fields default to zero
        assert_eq!(links[1].domain_rating, 0.0);
    }

    #[test]
    fn test_metrics_response_deserializes_with_defaults() {
        let json = r#"{"metrics": {"domain_rating": 55.0, "backlinks": 1200, "refdomains": 300}}"#;
        let parsed: MetricsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.metrics.backlinks, 1200);
        assert_eq!(parsed.metrics.refdomains, 300);
        assert_eq!(parsed.metrics.traffic, 0);
    }

    #[test]
    fn test_target_mode_wire_forms() {
        assert_eq!(TargetMode::Exact.as_str(), "exact");
        assert_eq!(TargetMode::Domain.as_str(), "domain");
        assert_eq!(TargetMode::Subdomains.as_str(), "subdomains");
    }
}
