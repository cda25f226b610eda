//! Backlink quality scoring — weighted sum over authority and relevance
//! signals, mapped to a four-tier label.
//!
//! Weights: domain rating 40, link type 20, anchor relevance 20, context
//! relevance 20. Every non-dofollow link type (nofollow, UGC, sponsored)
//! collapses to the same reduced weight of 5 — "not dofollow" is a single
//! penalized bucket, not a spectrum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rel-attribute classification of a link, as reported by the backlink
/// vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Dofollow,
    Nofollow,
    Ugc,
    Sponsored,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Dofollow => "dofollow",
            LinkType::Nofollow => "nofollow",
            LinkType::Ugc => "ugc",
            LinkType::Sponsored => "sponsored",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input signals for scoring a single backlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklinkSignal {
    /// Linking domain's authority, 0–100.
    pub domain_rating: f64,
    pub link_type: LinkType,
    /// How well the anchor text matches the target topic, 0–100.
    pub anchor_relevance: f64,
    /// How well the surrounding page content matches, 0–100.
    pub context_relevance: f64,
}

/// Quality tier. Boundary scores belong to the higher tier:
/// ≥80 excellent, ≥60 good, ≥40 fair, else poor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => QualityTier::Excellent,
            s if s >= 60 => QualityTier::Good,
            s if s >= 40 => QualityTier::Fair,
            _ => QualityTier::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "excellent",
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored backlink quality: the 0–100 score and its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkQuality {
    pub score: u8,
    pub quality: QualityTier,
}

/// Scores a backlink's quality from its signals.
///
/// `score = dr/100·40 + (dofollow ? 20 : 5) + anchor/100·20 + context/100·20`,
/// clamped to [0, 100] and rounded. Total for any finite input.
pub fn validate_backlink_quality(signal: &BacklinkSignal) -> BacklinkQuality {
    let mut score = 0.0;

    // Domain rating (40% weight)
    score += (signal.domain_rating / 100.0) * 40.0;

    // Link type (20% weight) — any non-dofollow collapses to 5
    score += if signal.link_type == LinkType::Dofollow {
        20.0
    } else {
        5.0
    };

    // Anchor relevance (20% weight)
    score += (signal.anchor_relevance / 100.0) * 20.0;

    // Context relevance (20% weight)
    score += (signal.context_relevance / 100.0) * 20.0;

    let score = score.clamp(0.0, 100.0).round() as u8;

    BacklinkQuality {
        score,
        quality: QualityTier::from_score(score),
    }
}
