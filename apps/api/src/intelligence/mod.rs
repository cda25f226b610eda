//! Keyword Intelligence Engine — the deterministic scoring core.
//!
//! Three pure, total functions and the record types they operate on:
//! intent classification, keyword priority scoring, and backlink quality
//! scoring. No I/O, no shared state, no locks — safe to call from any
//! number of tasks concurrently. All scores are clamped to [0, 100].
//!
//! Input sanitation lives at the boundary (`sanitize`), not inside the
//! scoring functions: for any finite numeric input these functions return
//! a value, never an error.

pub mod backlink_quality;
pub mod intent;
pub mod priority;
pub mod sanitize;

pub use backlink_quality::{validate_backlink_quality, BacklinkQuality, BacklinkSignal, LinkType, QualityTier};
pub use intent::{classify_intent, IntentLabel};
pub use priority::{calculate_priority, KeywordMetrics};
