//! Brand health scoring for brandmirror.
//!
//! Blends the five-category MARBA framework with the four-category Mirror
//! framework into one 0–100 health score, and derives the capped list of
//! critical gaps from the three sub-analysis payloads. Everything here is pure:
//! no I/O, no clocks except where a caller asks for "now".

pub mod blend;
pub mod gaps;
pub mod marba;
pub mod mirror;
pub mod types;

pub use blend::{calculate_brand_health_score, calculate_brand_health_score_at, status_for};
pub use gaps::{identify_critical_gaps, MAX_CRITICAL_GAPS};
pub use marba::score_marba;
pub use mirror::score_mirror;
pub use types::{
    BrandHealthScore, CompleteBrandAnalysis, HealthScoreSnapshot, HealthStatus, InsightKind,
    MarbaCategory, MarbaScores, MirrorScores, ScoreBreakdown, ScoreInsight, ScoreTrend,
};
