//! Google Search Console client — search analytics queries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vendors::{send_with_retry, VendorError};

/// One aggregated row from the search analytics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAnalyticsRow {
    pub page: String,
    pub query: String,
    pub clicks: f64,
    pub impressions: f64,
    pub ctr: f64,
    pub position: f64,
}

#[derive(Debug, Serialize)]
struct AnalyticsRequest<'a> {
    #[serde(rename = "startDate")]
    start_date: &'a str,
    #[serde(rename = "endDate")]
    end_date: &'a str,
    dimensions: &'a [&'a str],
    #[serde(rename = "rowLimit")]
    row_limit: u32,
}

#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    #[serde(default)]
    rows: Vec<WireRow>,
}

#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    clicks: f64,
    #[serde(default)]
    impressions: f64,
    #[serde(default)]
    ctr: f64,
    #[serde(default)]
    position: f64,
}

#[derive(Clone)]
pub struct GscClient {
    client: reqwest::Client,
    access_token: String,
}

impl GscClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }

    /// Queries search analytics for a property over a date window.
    /// Dates are `YYYY-MM-DD`. Dimensions default to page + query when empty.
    pub async fn search_analytics(
        &self,
        site_url: &str,
        start_date: &str,
        end_date: &str,
        dimensions: &[&str],
        row_limit: u32,
    ) -> Result<Vec<SearchAnalyticsRow>, VendorError> {
        let dimensions = if dimensions.is_empty() {
            &["page", "query"]
        } else {
            dimensions
        };
        let url = format!(
            "https://www.googleapis.com/webmasters/v3/sites/{}/searchAnalytics/query",
            urlencode(site_url)
        );
        let body = AnalyticsRequest {
            start_date,
            end_date,
            dimensions,
            row_limit,
        };

        let response = send_with_retry(
            || {
                self.client
                    .post(&url)
                    .bearer_auth(&self.access_token)
                    .json(&body)
            },
            "Search Console",
        )
        .await?;

        let parsed: AnalyticsResponse = response.json().await?;
        let rows: Vec<SearchAnalyticsRow> = parsed
            .rows
            .into_iter()
            .map(|row| SearchAnalyticsRow {
                page: row.keys.first().cloned().unwrap_or_default(),
                query: row.keys.get(1).cloned().unwrap_or_default(),
                clicks: row.clicks,
                impressions: row.impressions,
                ctr: row.ctr,
                position: row.position,
            })
            .collect();
        debug!("GSC search_analytics({site_url}): {} rows", rows.len());
        Ok(rows)
    }
}

/// Percent-encodes a property URL for use as a path segment.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode_escapes_property_urls() {
        assert_eq!(
            urlencode("https://example.com/"),
            "https%3A%2F%2Fexample.com%2F"
        );
        assert_eq!(urlencode("sc-domain:example.com"), "sc-domain%3Aexample.com");
    }

    #[test]
    fn test_analytics_response_maps_keys_to_page_and_query() {
        let json = r#"{
            "rows": [
                {"keys": ["https://example.com/blog/a", "best crm"], "clicks": 42.0,
                 "impressions": 900.0, "ctr": 0.046, "position": 7.3},
                {"keys": ["https://example.com/blog/b"], "clicks": 3.0,
                 "impressions": 50.0, "ctr": 0.06, "position": 18.2}
            ]
        }"#;
        let parsed: AnalyticsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].keys[1], "best crm");
        // Missing second key degrades to empty query downstream
        assert_eq!(parsed.rows[1].keys.len(), 1);
    }

    #[test]
    fn test_empty_response_deserializes() {
        let parsed: AnalyticsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_request_serializes_with_camel_case_keys() {
        let body = AnalyticsRequest {
            start_date: "2026-08-01",
            end_date: "2026-08-08",
            dimensions: &["query"],
            row_limit: 1000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["startDate"], "2026-08-01");
        assert_eq!(json["rowLimit"], 1000);
    }
}
