//! Boundary validation for the scoring core.
//!
//! The scoring functions themselves are total and never validate — callers
//! sanitize here first. Two flavors: `validate_*` rejects malformed input
//! (HTTP handlers turn the message into a 400), `clamp_*` coerces vendor
//! data into range (batch pipelines prefer degraded data over dropped
//! items).

use crate::intelligence::backlink_quality::BacklinkSignal;
use crate::intelligence::priority::KeywordMetrics;

/// Rejects non-finite or out-of-domain metrics with a field-naming message.
pub fn validate_metrics(metrics: &KeywordMetrics) -> Result<(), String> {
    ensure_finite("difficulty", metrics.difficulty)?;
    ensure_finite("cpc", metrics.cpc)?;
    if !(0.0..=100.0).contains(&metrics.difficulty) {
        return Err(format!(
            "difficulty must be in [0, 100], got {}",
            metrics.difficulty
        ));
    }
    if metrics.cpc < 0.0 {
        return Err(format!("cpc must be non-negative, got {}", metrics.cpc));
    }
    if metrics.current_position == Some(0) {
        return Err("current_position must be a positive rank".to_string());
    }
    Ok(())
}

/// Rejects non-finite or out-of-range backlink signals.
pub fn validate_signal(signal: &BacklinkSignal) -> Result<(), String> {
    for (field, value) in [
        ("domain_rating", signal.domain_rating),
        ("anchor_relevance", signal.anchor_relevance),
        ("context_relevance", signal.context_relevance),
    ] {
        ensure_finite(field, value)?;
        if !(0.0..=100.0).contains(&value) {
            return Err(format!("{field} must be in [0, 100], got {value}"));
        }
    }
    Ok(())
}

/// Coerces vendor-supplied metrics into the scoring domain.
/// NaN collapses to 0, difficulty clamps to [0, 100], cpc floors at 0.
pub fn clamp_metrics(metrics: &KeywordMetrics) -> KeywordMetrics {
    KeywordMetrics {
        search_volume: metrics.search_volume,
        difficulty: finite_or_zero(metrics.difficulty).clamp(0.0, 100.0),
        cpc: finite_or_zero(metrics.cpc).max(0.0),
        current_position: metrics.current_position.filter(|p| *p > 0),
    }
}

/// Coerces vendor-supplied backlink signals into the scoring domain.
pub fn clamp_signal(signal: &BacklinkSignal) -> BacklinkSignal {
    BacklinkSignal {
        domain_rating: finite_or_zero(signal.domain_rating).clamp(0.0, 100.0),
        link_type: signal.link_type,
        anchor_relevance: finite_or_zero(signal.anchor_relevance).clamp(0.0, 100.0),
        context_relevance: finite_or_zero(signal.context_relevance).clamp(0.0, 100.0),
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{field} must be a finite number"))
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::backlink_quality::LinkType;

    fn metrics(difficulty: f64, cpc: f64) -> KeywordMetrics {
        KeywordMetrics {
            search_volume: 100,
            difficulty,
            cpc,
            current_position: None,
        }
    }

    #[test]
    fn test_valid_metrics_pass() {
        assert!(validate_metrics(&metrics(50.0, 1.2)).is_ok());
    }

    #[test]
    fn test_nan_difficulty_rejected_with_field_name() {
        let err = validate_metrics(&metrics(f64::NAN, 1.0)).unwrap_err();
        assert!(err.contains("difficulty"), "message was: {err}");
    }

    #[test]
    fn test_out_of_range_difficulty_rejected() {
        assert!(validate_metrics(&metrics(101.0, 0.0)).is_err());
        assert!(validate_metrics(&metrics(-1.0, 0.0)).is_err());
    }

    #[test]
    fn test_negative_cpc_rejected() {
        assert!(validate_metrics(&metrics(50.0, -0.5)).is_err());
    }

    #[test]
    fn test_zero_position_rejected() {
        let m = KeywordMetrics {
            current_position: Some(0),
            ..metrics(50.0, 0.0)
        };
        assert!(validate_metrics(&m).is_err());
    }

    #[test]
    fn test_clamp_metrics_coerces_into_domain() {
        let m = KeywordMetrics {
            search_volume: 500,
            difficulty: f64::NAN,
            cpc: -3.0,
            current_position: Some(0),
        };
        let clamped = clamp_metrics(&m);
        assert_eq!(clamped.difficulty, 0.0);
        assert_eq!(clamped.cpc, 0.0);
        assert_eq!(clamped.current_position, None);
        assert_eq!(clamped.search_volume, 500);
    }

    #[test]
    fn test_clamp_metrics_preserves_in_domain_values() {
        let m = KeywordMetrics {
            search_volume: 900,
            difficulty: 33.0,
            cpc: 2.4,
            current_position: Some(12),
        };
        assert_eq!(clamp_metrics(&m), m);
    }

    #[test]
    fn test_validate_signal_checks_each_field() {
        let bad = BacklinkSignal {
            domain_rating: 50.0,
            link_type: LinkType::Dofollow,
            anchor_relevance: 130.0,
            context_relevance: 10.0,
        };
        let err = validate_signal(&bad).unwrap_err();
        assert!(err.contains("anchor_relevance"), "message was: {err}");
    }

    #[test]
    fn test_clamp_signal_bounds_percentages() {
        let s = BacklinkSignal {
            domain_rating: 250.0,
            link_type: LinkType::Ugc,
            anchor_relevance: -40.0,
            context_relevance: f64::INFINITY,
        };
        let clamped = clamp_signal(&s);
        assert_eq!(clamped.domain_rating, 100.0);
        assert_eq!(clamped.anchor_relevance, 0.0);
        assert_eq!(clamped.context_relevance, 0.0);
        assert_eq!(clamped.link_type, LinkType::Ugc);
    }
}
