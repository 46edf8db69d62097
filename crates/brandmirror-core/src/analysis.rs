//! Sub-analysis result payloads and their fixed fallbacks.
//!
//! Each sub-analyzer returns a [`SubAnalysisResult`] carrying a 0–100 score and
//! an analyzer-specific payload. When an analyzer fails or times out, the
//! orchestrator substitutes the payload's `fallback()` at [`FALLBACK_SCORE`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Neutral score substituted for any sub-analysis that did not complete.
pub const FALLBACK_SCORE: u8 = 50;

/// Score plus payload produced by one sub-analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAnalysisResult<T> {
    pub score: u8,
    pub data: T,
}

impl<T> SubAnalysisResult<T> {
    /// Clamp the score into `0..=100`.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.score = self.score.min(100);
        self
    }
}

impl SubAnalysisResult<MarketPositionData> {
    #[must_use]
    pub fn market_position_fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            data: MarketPositionData::fallback(),
        }
    }
}

impl SubAnalysisResult<CustomerTruthData> {
    #[must_use]
    pub fn customer_truth_fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            data: CustomerTruthData::fallback(),
        }
    }
}

impl SubAnalysisResult<BrandFitData> {
    #[must_use]
    pub fn brand_fit_fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            data: BrandFitData::fallback(),
        }
    }
}

// ---------------------------------------------------------------------------
// Market position
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSnapshot {
    pub name: String,
    pub rank: u32,
    #[serde(default)]
    pub strength: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPositionData {
    /// 1-based rank among `total_competitors`.
    pub current_rank: u32,
    pub total_competitors: u32,
    #[serde(default)]
    pub top_competitors: Vec<CompetitorSnapshot>,
    #[serde(default)]
    pub keyword_rankings: BTreeMap<String, u32>,
    #[serde(default)]
    pub note: Option<String>,
}

impl MarketPositionData {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            current_rank: 5,
            total_competitors: 10,
            top_competitors: Vec::new(),
            keyword_rankings: BTreeMap::new(),
            note: Some(
                "Market position analysis failed; showing a neutral placeholder".to_string(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Customer truth
// ---------------------------------------------------------------------------

const PRICE_COMPETING_MARKERS: &[&str] = &["cheapest", "competing on price", "lowest price"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerTruthData {
    #[serde(default)]
    pub expected_demographic: Option<String>,
    #[serde(default)]
    pub actual_demographic: Option<String>,
    /// Share of reviewers matching the intended audience, 0–100.
    pub match_percentage: f64,
    #[serde(default)]
    pub why_they_choose: Vec<String>,
    #[serde(default)]
    pub common_objections: Vec<String>,
    #[serde(default)]
    pub price_vs_value_perception: String,
}

impl CustomerTruthData {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            expected_demographic: None,
            actual_demographic: None,
            match_percentage: 50.0,
            why_they_choose: Vec::new(),
            common_objections: vec![
                "Customer truth analysis failed; no review data was mined".to_string(),
            ],
            price_vs_value_perception: "unknown".to_string(),
        }
    }

    /// Whether customers perceive the brand as winning on price alone.
    #[must_use]
    pub fn competes_on_price(&self) -> bool {
        let perception = self.price_vs_value_perception.to_lowercase();
        PRICE_COMPETING_MARKERS
            .iter()
            .any(|marker| perception.contains(marker))
    }
}

// ---------------------------------------------------------------------------
// Brand fit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandFitData {
    pub messaging_consistency: f64,
    pub differentiation_score: f64,
    pub clarity_score: f64,
    pub touchpoint_alignment: f64,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl BrandFitData {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            messaging_consistency: 50.0,
            differentiation_score: 50.0,
            clarity_score: 50.0,
            touchpoint_alignment: 50.0,
            observations: vec!["Brand fit analysis failed; metrics set to neutral".to_string()],
        }
    }
}
