//! Intent classification — maps a keyword string to a search-intent label
//! using lexical marker rules. Fast, deterministic, no LLM call.
//!
//! Marker families are checked in fixed priority order: transactional,
//! then commercial, then informational. The ordering is a deliberate
//! tie-break — "how to buy a vpn" carries both a transactional and an
//! informational marker and must classify as transactional.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Search intent behind a keyword. Mutually exclusive.
///
/// `Navigational` is never produced by the lexical classifier — it is only
/// reachable through the LLM backend (`enrichment::classifier`), which can
/// recognize brand/site lookups the marker lists cannot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentLabel {
    #[default]
    Informational,
    Transactional,
    Commercial,
    Navigational,
}

impl IntentLabel {
    /// Lowercase wire/database form, matching the vendor vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Informational => "informational",
            IntentLabel::Transactional => "transactional",
            IntentLabel::Commercial => "commercial",
            IntentLabel::Navigational => "navigational",
        }
    }

    /// Parses the lowercase wire form. Unrecognized input returns `None`;
    /// callers decide whether to default (the LLM backend does).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "informational" => Some(IntentLabel::Informational),
            "transactional" => Some(IntentLabel::Transactional),
            "commercial" => Some(IntentLabel::Commercial),
            "navigational" => Some(IntentLabel::Navigational),
            _ => None,
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase-ready markers. Checked first.
const TRANSACTIONAL_MARKERS: &[&str] = &[
    "buy", "purchase", "order", "download", "get", "subscribe", "pricing", "price", "deal",
    "coupon",
];

/// Research-before-purchase markers. Checked second.
const COMMERCIAL_MARKERS: &[&str] = &[
    "best", "top", "review", "compare", "vs", "versus", "alternative", "comparison",
];

/// Learning markers. Checked last; also the fallback.
const INFORMATIONAL_MARKERS: &[&str] = &[
    "how", "what", "why", "when", "where", "guide", "tutorial", "learn", "example", "examples",
];

/// Classifies a keyword's search intent from lexical markers.
///
/// Total function: any string (including empty) classifies, defaulting to
/// `Informational` when no marker matches. Markers match whole words only —
/// "price" must not fire inside "priceless".
pub fn classify_intent(keyword: &str) -> IntentLabel {
    let lower = keyword.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let hits = |markers: &[&str]| tokens.iter().any(|t| markers.contains(t));

    if hits(TRANSACTIONAL_MARKERS) {
        IntentLabel::Transactional
    } else if hits(COMMERCIAL_MARKERS) {
        IntentLabel::Commercial
    } else if hits(INFORMATIONAL_MARKERS) {
        IntentLabel::Informational
    } else {
        IntentLabel::Informational
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commercial_marker_wins_over_informational() {
        // "best" is commercial; no transactional marker present
        assert_eq!(
            classify_intent("best vpn for streaming"),
            IntentLabel::Commercial
        );
    }

    #[test]
    fn test_transactional_checked_before_informational() {
        // "how" is informational but "buy" must win
        assert_eq!(classify_intent("how to buy a vpn"), IntentLabel::Transactional);
    }

    #[test]
    fn test_transactional_checked_before_commercial() {
        assert_eq!(
            classify_intent("best price on laptops"),
            IntentLabel::Transactional
        );
    }

    #[test]
    fn test_unmatched_defaults_to_informational() {
        assert_eq!(classify_intent("random brand name"), IntentLabel::Informational);
    }

    #[test]
    fn test_empty_string_defaults_to_informational() {
        assert_eq!(classify_intent(""), IntentLabel::Informational);
    }

    #[test]
    fn test_markers_match_whole_words_only() {
        // "priceless" contains "price" as a substring but not as a token
        assert_eq!(classify_intent("priceless moments"), IntentLabel::Informational);
        // "besting" contains "best"
        assert_eq!(classify_intent("besting rivals"), IntentLabel::Informational);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify_intent("BUY NOW"), IntentLabel::Transactional);
        assert_eq!(classify_intent("Best Crm Software"), IntentLabel::Commercial);
    }

    #[test]
    fn test_punctuation_separates_tokens() {
        assert_eq!(classify_intent("notion vs. asana"), IntentLabel::Commercial);
        assert_eq!(classify_intent("what's a vpn"), IntentLabel::Informational);
    }

    #[test]
    fn test_lexical_path_never_produces_navigational() {
        let samples = [
            "github login",
            "facebook",
            "amazon prime video",
            "openai api docs",
        ];
        for s in samples {
            assert_ne!(classify_intent(s), IntentLabel::Navigational, "keyword: {s}");
        }
    }

    #[test]
    fn test_guide_and_tutorial_are_informational() {
        assert_eq!(classify_intent("rust async guide"), IntentLabel::Informational);
        assert_eq!(classify_intent("sqlx tutorial"), IntentLabel::Informational);
    }

    #[test]
    fn test_repeated_calls_yield_identical_output() {
        let kw = "best way to get coupons";
        assert_eq!(classify_intent(kw), classify_intent(kw));
    }

    #[test]
    fn test_serde_uses_lowercase_wire_form() {
        assert_eq!(
            serde_json::to_string(&IntentLabel::Transactional).unwrap(),
            r#""transactional""#
        );
        let parsed: IntentLabel = serde_json::from_str(r#""commercial""#).unwrap();
        assert_eq!(parsed, IntentLabel::Commercial);
    }

    #[test]
    fn test_parse_roundtrips_as_str() {
        for label in [
            IntentLabel::Informational,
            IntentLabel::Transactional,
            IntentLabel::Commercial,
            IntentLabel::Navigational,
        ] {
            assert_eq!(IntentLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(IntentLabel::parse("  Commercial "), Some(IntentLabel::Commercial));
        assert_eq!(IntentLabel::parse("buying"), None);
    }
}
