//! SEMrush client — keyword research reports.
//!
//! SEMrush replies with semicolon-delimited CSV, one row per keyword, first
//! line a header. Report parsing is split out as pure functions so the wire
//! format is testable without a network.

use serde::Serialize;
use tracing::debug;

use crate::intelligence::intent::{classify_intent, IntentLabel};
use crate::vendors::{send_with_retry, VendorError};

const SEMRUSH_API_URL: &str = "https://api.semrush.com/";

/// One keyword row from a SEMrush report, normalized for the pipelines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordData {
    pub keyword: String,
    pub search_volume: u64,
    /// Competition normalized to 0–100.
    pub difficulty: f64,
    pub cpc: f64,
    /// Lexically classified at parse time.
    pub intent: IntentLabel,
    /// Present only in domain_organic rows.
    pub current_position: Option<u32>,
}

/// Domain-level overview from the domain_ranks report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainOverview {
    pub domain: String,
    pub rank: u64,
    pub organic_keywords: u64,
    pub organic_traffic: u64,
    pub organic_cost: f64,
    pub paid_keywords: u64,
    pub paid_traffic: u64,
    pub paid_cost: f64,
}

#[derive(Clone)]
pub struct SemrushClient {
    client: reqwest::Client,
    api_key: String,
}

impl SemrushClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Related-keyword research for a seed phrase (phrase_related report).
    pub async fn research_keywords(
        &self,
        phrase: &str,
        database: &str,
        limit: u32,
    ) -> Result<Vec<KeywordData>, VendorError> {
        let limit = limit.to_string();
        let response = send_with_retry(
            || {
                self.client.get(SEMRUSH_API_URL).query(&[
                    ("type", "phrase_related"),
                    ("key", self.api_key.as_str()),
                    ("phrase", phrase),
                    ("database", database),
                    ("display_limit", limit.as_str()),
                    ("export_columns", "Ph,Nq,Cp,Co,Nr,Td"),
                ])
            },
            "SEMrush",
        )
        .await?;

        let body = response.text().await?;
        let keywords = parse_phrase_related(&body);
        debug!("SEMrush phrase_related({phrase}): {} keywords", keywords.len());
        Ok(keywords)
    }

    /// Organic keywords a competitor domain ranks for (domain_organic report).
    pub async fn competitor_keywords(
        &self,
        domain: &str,
        limit: u32,
    ) -> Result<Vec<KeywordData>, VendorError> {
        let limit = limit.to_string();
        let response = send_with_retry(
            || {
                self.client.get(SEMRUSH_API_URL).query(&[
                    ("type", "domain_organic"),
                    ("key", self.api_key.as_str()),
                    ("domain", domain),
                    ("display_limit", limit.as_str()),
                    ("export_columns", "Ph,Po,Nq,Cp,Co,Tr,Tc,Nr,Td"),
                ])
            },
            "SEMrush",
        )
        .await?;

        let body = response.text().await?;
        let keywords = parse_domain_organic(&body);
        debug!("SEMrush domain_organic({domain}): {} keywords", keywords.len());
        Ok(keywords)
    }

    /// Domain-level rank and traffic metrics (domain_ranks report).
    pub async fn domain_overview(&self, domain: &str) -> Result<DomainOverview, VendorError> {
        let response = send_with_retry(
            || {
                self.client.get(SEMRUSH_API_URL).query(&[
                    ("type", "domain_ranks"),
                    ("key", self.api_key.as_str()),
                    ("domain", domain),
                    ("database", "us"),
                    ("export_columns", "Dn,Rk,Or,Ot,Oc,Ad,At,Ac"),
                ])
            },
            "SEMrush",
        )
        .await?;

        let body = response.text().await?;
        parse_domain_ranks(&body, domain)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CSV report parsing
// ────────────────────────────────────────────────────────────────────────────

/// Parses a phrase_related report: `keyword;volume;cpc;competition;results;trend`.
/// Malformed rows are skipped, not fatal — one bad line must not drop a report.
pub fn parse_phrase_related(body: &str) -> Vec<KeywordData> {
    body.lines()
        .skip(1) // header
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(';').collect();
            let keyword = fields.first()?.trim();
            if keyword.is_empty() {
                return None;
            }
            Some(KeywordData {
                keyword: keyword.to_string(),
                search_volume: parse_u64(fields.get(1)),
                cpc: parse_f64(fields.get(2)),
                difficulty: (parse_f64(fields.get(3)) * 100.0).clamp(0.0, 100.0),
                intent: classify_intent(keyword),
                current_position: None,
            })
        })
        .collect()
}

/// Parses a domain_organic report: `keyword;position;volume;cpc;competition;...`.
pub fn parse_domain_organic(body: &str) -> Vec<KeywordData> {
    body.lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(';').collect();
            let keyword = fields.first()?.trim();
            if keyword.is_empty() {
                return None;
            }
            let position = fields
                .get(1)
                .and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|p| *p > 0);
            Some(KeywordData {
                keyword: keyword.to_string(),
                current_position: position,
                search_volume: parse_u64(fields.get(2)),
                cpc: parse_f64(fields.get(3)),
                difficulty: (parse_f64(fields.get(4)) * 100.0).clamp(0.0, 100.0),
                intent: classify_intent(keyword),
            })
        })
        .collect()
}

/// Parses a domain_ranks report (header + single data line).
pub fn parse_domain_ranks(body: &str, domain: &str) -> Result<DomainOverview, VendorError> {
    let data = body
        .lines()
        .nth(1)
        .ok_or_else(|| VendorError::Malformed("domain_ranks report has no data row".to_string()))?;
    let fields: Vec<&str> = data.split(';').collect();
    if fields.len() < 8 {
        return Err(VendorError::Malformed(format!(
            "domain_ranks row has {} fields, expected 8",
            fields.len()
        )));
    }
    Ok(DomainOverview {
        domain: domain.to_string(),
        rank: parse_u64(fields.get(1)),
        organic_keywords: parse_u64(fields.get(2)),
        organic_traffic: parse_u64(fields.get(3)),
        organic_cost: parse_f64(fields.get(4)),
        paid_keywords: parse_u64(fields.get(5)),
        paid_traffic: parse_u64(fields.get(6)),
        paid_cost: parse_f64(fields.get(7)),
    })
}

fn parse_u64(field: Option<&&str>) -> u64 {
    field.and_then(|f| f.trim().parse().ok()).unwrap_or(0)
}

fn parse_f64(field: Option<&&str>) -> f64 {
    field.and_then(|f| f.trim().parse().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE_REPORT: &str = "\
Keyword;Search Volume;CPC;Competition;Number of Results;Trends
best crm software;12100;14.50;0.87;120000000;0.8,0.9,1.0
crm tutorial;880;2.10;0.33;4500000;0.5,0.5,0.6
buy crm license;320;9.75;0.91;2100000;0.4,0.4,0.5";

    const ORGANIC_REPORT: &str = "\
Keyword;Position;Search Volume;CPC;Competition;Traffic;Traffic Cost;Results;Trends
project management tool;14;8100;6.20;0.74;900;5580;88000000;1.0
what is kanban;3;5400;1.10;0.21;1600;1760;12000000;0.9";

    #[test]
    fn test_parse_phrase_related_skips_header() {
        let rows = parse_phrase_related(PHRASE_REPORT);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].keyword, "best crm software");
        assert_eq!(rows[0].search_volume, 12100);
        assert!((rows[0].cpc - 14.50).abs() < f64::EPSILON);
    }

    #[test]
    fn test_competition_scales_to_difficulty() {
        let rows = parse_phrase_related(PHRASE_REPORT);
        assert!((rows[0].difficulty - 87.0).abs() < 1e-9);
        assert!((rows[1].difficulty - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_intent_classified_during_parse() {
        let rows = parse_phrase_related(PHRASE_REPORT);
        assert_eq!(rows[0].intent, IntentLabel::Commercial);
        assert_eq!(rows[1].intent, IntentLabel::Informational);
        assert_eq!(rows[2].intent, IntentLabel::Transactional);
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let body = "Keyword;Search Volume;CPC;Competition;Results;Trends\n\
                    good keyword;100;1.0;0.5;10;\n\
                    ;;;;\n\
                    \n\
                    another keyword;abc;xyz;not-a-number;;";
        let rows = parse_phrase_related(body);
        assert_eq!(rows.len(), 2);
        // Unparseable numerics degrade to zero rather than dropping the row
        assert_eq!(rows[1].search_volume, 0);
        assert_eq!(rows[1].cpc, 0.0);
        assert_eq!(rows[1].difficulty, 0.0);
    }

    #[test]
    fn test_parse_domain_organic_carries_position() {
        let rows = parse_domain_organic(ORGANIC_REPORT);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].current_position, Some(14));
        assert_eq!(rows[0].search_volume, 8100);
        assert_eq!(rows[1].current_position, Some(3));
        assert_eq!(rows[1].intent, IntentLabel::Informational);
    }

    #[test]
    fn test_parse_domain_ranks_happy_path() {
        let body = "Domain;Rank;Organic Keywords;Organic Traffic;Organic Cost;Adwords Keywords;Adwords Traffic;Adwords Cost\n\
                    example.com;1523;48000;920000;310000.50;120;9500;22000.75";
        let overview = parse_domain_ranks(body, "example.com").unwrap();
        assert_eq!(overview.rank, 1523);
        assert_eq!(overview.organic_keywords, 48000);
        assert_eq!(overview.organic_traffic, 920000);
        assert!((overview.paid_cost - 22000.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_domain_ranks_missing_data_row_errors() {
        let err = parse_domain_ranks("Domain;Rank\n", "example.com").unwrap_err();
        assert!(matches!(err, VendorError::Malformed(_)));
    }

    #[test]
    fn test_empty_report_yields_no_keywords() {
        assert!(parse_phrase_related("").is_empty());
        assert!(parse_domain_organic("Keyword;Position\n").is_empty());
    }
}
