use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input: detailed brand analysis
// ---------------------------------------------------------------------------

/// Detailed brand analysis consumed by the health scorer.
///
/// Produced upstream by the brand-analysis collaborator. Only the fields the
/// scoring rules read are modelled here; unknown JSON keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteBrandAnalysis {
    pub messaging: MessagingAnalysis,
    pub audience: AudienceAnalysis,
    pub metrics: BrandMetrics,
    pub identity: IdentityAnalysis,
    pub golden_circle: GoldenCircle,
    #[serde(default)]
    pub tone: ToneProfile,
    #[serde(default)]
    pub competitive: Option<CompetitiveAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagingAnalysis {
    #[serde(default)]
    pub value_proposition: Option<String>,
    #[serde(default)]
    pub differentiators: Vec<String>,
    pub voice_consistency: f64,
    #[serde(default)]
    pub positioning_statement: Option<String>,
    #[serde(default)]
    pub themes: Vec<MessagingTheme>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingTheme {
    pub name: String,
    #[serde(default)]
    pub call_to_action: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceAnalysis {
    #[serde(default)]
    pub personas: Vec<Persona>,
    /// Confidence of the industry classification, 0–100.
    pub industry_confidence: f64,
    #[serde(default)]
    pub target_statement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Aggregate engagement signals, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrandMetrics {
    pub engagement: f64,
    pub consistency: f64,
    pub clarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAnalysis {
    #[serde(default)]
    pub archetypes: Vec<ArchetypeScore>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeScore {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldenCircle {
    pub why_score: f64,
    pub how_score: f64,
    pub what_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneProfile {
    /// Tone dimension name to strength, 0–100. Ordered for stable summation.
    #[serde(default)]
    pub dimensions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveAnalysis {
    #[serde(default)]
    pub scorecards: Vec<CompetitorScorecard>,
    #[serde(default)]
    pub strategic_insights: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorScorecard {
    pub competitor: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Output: blended health score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Excellent => write!(f, "excellent"),
            HealthStatus::Good => write!(f, "good"),
            HealthStatus::Fair => write!(f, "fair"),
            HealthStatus::NeedsWork => write!(f, "needs-work"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarbaCategory {
    Messaging,
    Audience,
    Reviews,
    Brand,
    Ads,
}

impl MarbaCategory {
    pub const ALL: [MarbaCategory; 5] = [
        MarbaCategory::Messaging,
        MarbaCategory::Audience,
        MarbaCategory::Reviews,
        MarbaCategory::Brand,
        MarbaCategory::Ads,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MarbaCategory::Messaging => "Messaging",
            MarbaCategory::Audience => "Audience",
            MarbaCategory::Reviews => "Reviews",
            MarbaCategory::Brand => "Brand",
            MarbaCategory::Ads => "Ads",
        }
    }

    /// Contribution of this category to the MARBA total.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            MarbaCategory::Messaging => 0.22,
            MarbaCategory::Audience => 0.19,
            MarbaCategory::Reviews => 0.24,
            MarbaCategory::Brand => 0.20,
            MarbaCategory::Ads => 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarbaScores {
    pub messaging: f64,
    pub audience: f64,
    pub reviews: f64,
    pub brand: f64,
    pub ads: f64,
}

impl MarbaScores {
    #[must_use]
    pub fn get(&self, category: MarbaCategory) -> f64 {
        match category {
            MarbaCategory::Messaging => self.messaging,
            MarbaCategory::Audience => self.audience,
            MarbaCategory::Reviews => self.reviews,
            MarbaCategory::Brand => self.brand,
            MarbaCategory::Ads => self.ads,
        }
    }

    /// Weighted MARBA total, 0–100.
    #[must_use]
    pub fn weighted_total(&self) -> f64 {
        MarbaCategory::ALL
            .iter()
            .map(|&c| c.weight() * self.get(c))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorScores {
    pub golden_circle: f64,
    pub archetype: f64,
    pub tone: f64,
    pub competitive: f64,
}

impl MirrorScores {
    /// Weighted Mirror total, 0–100.
    #[must_use]
    pub fn weighted_total(&self) -> f64 {
        0.30 * self.golden_circle
            + 0.25 * self.archetype
            + 0.20 * self.tone
            + 0.25 * self.competitive
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub category: MarbaCategory,
    pub label: String,
    pub score: f64,
    pub status: HealthStatus,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Opportunity,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInsight {
    pub kind: InsightKind,
    pub category: MarbaCategory,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrend {
    pub previous_score: u8,
    pub change: i16,
    pub period: String,
}

/// A previously computed total, supplied by the caller for trend reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScoreSnapshot {
    pub score: u8,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandHealthScore {
    pub total: u8,
    pub status: HealthStatus,
    pub marba_breakdown: MarbaScores,
    pub mirror_breakdown: MirrorScores,
    pub category_details: Vec<ScoreBreakdown>,
    pub insights: Vec<ScoreInsight>,
    pub last_calculated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<ScoreTrend>,
}
