//! Priority scoring — collapses a keyword's market signals into a single
//! 0–100 score used to rank content backlogs.
//!
//! Weights: volume 0.4, achievability 0.3, monetization 0.2, position
//! bonus 0.1. Traffic potential matters most, "quick win" rank position
//! least.

use serde::{Deserialize, Serialize};

/// One keyword's market-signal snapshot, as supplied by the keyword
/// research vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub search_volume: u64,
    /// 0–100; higher is harder to rank for.
    pub difficulty: f64,
    /// Cost-per-click in USD.
    pub cpc: f64,
    /// Current organic rank, when the project already ranks for the keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<u32>,
}

/// Computes the 0–100 priority score for a keyword.
///
/// Sub-scores:
/// - volume: `min(search_volume / 100, 100)` — saturates at 10,000 searches
/// - difficulty: `100 - difficulty` — lower difficulty scores higher
/// - value: `min(cpc * 20, 100)` — saturates at $5.00 CPC
/// - position bonus: 25 iff currently ranked in (10, 50] — just outside
///   page 1, the segment most responsive to further optimization
///
/// The weighted sum is clamped to [0, 100] before rounding, so the result
/// is in range for any finite input (out-of-range difficulty included).
pub fn calculate_priority(metrics: &KeywordMetrics) -> u8 {
    let volume_score = (metrics.search_volume as f64 / 100.0).min(100.0);
    let difficulty_score = 100.0 - metrics.difficulty;
    let value_score = (metrics.cpc * 20.0).min(100.0);
    let position_bonus = match metrics.current_position {
        Some(pos) if pos > 10 && pos <= 50 => 25.0,
        _ => 0.0,
    };

    let priority = volume_score * 0.4
        + difficulty_score * 0.3
        + value_score * 0.2
        + position_bonus * 0.1;

    priority.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(volume: u64, difficulty: f64, cpc: f64) -> KeywordMetrics {
        KeywordMetrics {
            search_volume: volume,
            difficulty,
            cpc,
            current_position: None,
        }
    }

    #[test]
    fn test_known_score_without_position() {
        // volume 1000 → 10, difficulty 50 → 50, cpc 0 → 0
        // 10*0.4 + 50*0.3 = 19
        assert_eq!(calculate_priority(&metrics(1000, 50.0, 0.0)), 19);
    }

    #[test]
    fn test_position_bonus_adds_2_5_and_rounds_up() {
        // 19 + 25*0.1 = 21.5 → rounds to 22
        let m = KeywordMetrics {
            current_position: Some(20),
            ..metrics(1000, 50.0, 0.0)
        };
        assert_eq!(calculate_priority(&m), 22);
    }

    #[test]
    fn test_position_bonus_window_is_half_open() {
        let at = |pos| KeywordMetrics {
            current_position: Some(pos),
            ..metrics(1000, 50.0, 0.0)
        };
        assert_eq!(calculate_priority(&at(10)), 19, "position 10 is page 1, no bonus");
        assert_eq!(calculate_priority(&at(11)), 22, "position 11 earns the bonus");
        assert_eq!(calculate_priority(&at(50)), 22, "position 50 still earns it");
        assert_eq!(calculate_priority(&at(51)), 19, "position 51 is too deep");
    }

    #[test]
    fn test_volume_saturates_at_ten_thousand() {
        let a = calculate_priority(&metrics(10_000, 100.0, 0.0));
        let b = calculate_priority(&metrics(5_000_000, 100.0, 0.0));
        assert_eq!(a, b, "volume beyond 10k must not raise the score");
        assert_eq!(a, 40); // 100*0.4
    }

    #[test]
    fn test_cpc_saturates_at_five_dollars() {
        let a = calculate_priority(&metrics(0, 100.0, 5.0));
        let b = calculate_priority(&metrics(0, 100.0, 250.0));
        assert_eq!(a, b);
        assert_eq!(a, 20); // 100*0.2
    }

    #[test]
    fn test_monotone_in_search_volume() {
        let mut last = 0;
        for volume in [0u64, 50, 100, 500, 1_000, 5_000, 10_000, 100_000] {
            let score = calculate_priority(&metrics(volume, 40.0, 1.5));
            assert!(score >= last, "score dropped at volume {volume}");
            last = score;
        }
    }

    #[test]
    fn test_antitone_in_difficulty() {
        let mut last = u8::MAX;
        for difficulty in [0.0, 10.0, 25.0, 50.0, 75.0, 90.0, 100.0] {
            let score = calculate_priority(&metrics(2000, difficulty, 1.5));
            assert!(score <= last, "score rose at difficulty {difficulty}");
            last = score;
        }
    }

    #[test]
    fn test_result_always_in_bounds() {
        for volume in [0u64, 100, 10_000, u64::MAX / 1000] {
            for difficulty in [-50.0, 0.0, 50.0, 100.0, 500.0] {
                for cpc in [0.0, 2.5, 100.0] {
                    for pos in [None, Some(1), Some(30), Some(200)] {
                        let m = KeywordMetrics {
                            search_volume: volume,
                            difficulty,
                            cpc,
                            current_position: pos,
                        };
                        let score = calculate_priority(&m);
                        assert!(score <= 100, "score {score} out of range for {m:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_clamped_to_100_before_rounding() {
        // All sub-scores maxed: 40 + 30 + 20 + 2.5 = 92.5 — the clamp only
        // bites when difficulty goes out of range below zero.
        let m = KeywordMetrics {
            search_volume: u64::MAX / 1000,
            difficulty: -1000.0,
            cpc: 1000.0,
            current_position: Some(20),
        };
        assert_eq!(calculate_priority(&m), 100);
    }

    #[test]
    fn test_out_of_range_difficulty_clamps_to_zero() {
        // difficulty 500 → difficulty_score -400 → weighted sum negative
        assert_eq!(calculate_priority(&metrics(0, 500.0, 0.0)), 0);
    }

    #[test]
    fn test_pure_function_idempotence() {
        let m = KeywordMetrics {
            search_volume: 3200,
            difficulty: 42.0,
            cpc: 1.8,
            current_position: Some(14),
        };
        assert_eq!(calculate_priority(&m), calculate_priority(&m));
    }

    #[test]
    fn test_metrics_deserialize_without_position() {
        let m: KeywordMetrics =
            serde_json::from_str(r#"{"search_volume":900,"difficulty":35.0,"cpc":0.4}"#).unwrap();
        assert_eq!(m.current_position, None);
        assert_eq!(m.search_volume, 900);
    }
}
