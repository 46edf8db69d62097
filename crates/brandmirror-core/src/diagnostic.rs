use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{BrandFitData, CustomerTruthData, MarketPositionData};

/// One actionable weakness surfaced by a diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalGap {
    /// 1-based position in the gap list.
    pub priority: u8,
    pub gap: String,
    pub impact: String,
    pub fix: String,
    pub fix_action_link: String,
}

/// How well the brand delivers on its declared value proposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvpDeliveryAnalysis {
    pub uvp_promise: String,
    pub delivery_score: u8,
    pub alignment: String,
    #[serde(default)]
    pub customer_confirmations: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Everything a run computes, before the store assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorDiagnosticDraft {
    pub brand_id: i64,
    pub market_position_score: u8,
    pub customer_match_score: u8,
    pub brand_clarity_score: u8,
    pub overall_health_score: u8,
    pub market_position_data: MarketPositionData,
    pub customer_truth_data: CustomerTruthData,
    pub brand_fit_data: BrandFitData,
    pub critical_gaps: Vec<CriticalGap>,
    pub uvp_delivery_analysis: Option<UvpDeliveryAnalysis>,
    pub has_completed_uvp: bool,
    pub has_buyer_journey: bool,
    pub analyzed_at: DateTime<Utc>,
}

/// The persisted per-brand diagnostic of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorDiagnostic {
    pub id: i64,
    pub brand_id: i64,
    pub market_position_score: u8,
    pub customer_match_score: u8,
    pub brand_clarity_score: u8,
    pub overall_health_score: u8,
    pub market_position_data: MarketPositionData,
    pub customer_truth_data: CustomerTruthData,
    pub brand_fit_data: BrandFitData,
    pub critical_gaps: Vec<CriticalGap>,
    pub uvp_delivery_analysis: Option<UvpDeliveryAnalysis>,
    pub has_completed_uvp: bool,
    pub has_buyer_journey: bool,
    pub analyzed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mean of the three sub-scores, rounded half away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn overall_health_score(market: u8, customer: u8, brand_fit: u8) -> u8 {
    let sum = f64::from(market) + f64::from(customer) + f64::from(brand_fit);
    (sum / 3.0).round().clamp(0.0, 100.0) as u8
}
