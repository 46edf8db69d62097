//! Blend MARBA and Mirror into one brand health score.

use chrono::{DateTime, Utc};

use crate::marba::score_marba;
use crate::mirror::score_mirror;
use crate::types::{
    BrandHealthScore, CompleteBrandAnalysis, HealthScoreSnapshot, HealthStatus, InsightKind,
    MarbaCategory, MarbaScores, ScoreBreakdown, ScoreInsight, ScoreTrend,
};

const MARBA_SHARE: f64 = 0.5;
const MIRROR_SHARE: f64 = 0.5;

const FIRST_CALCULATION_PERIOD: &str = "first calculation";
const TREND_PERIOD: &str = "30 days";

/// Compute the blended brand health score as of now.
///
/// A missing or empty `history` reports a first calculation; otherwise the
/// newest snapshot is compared.
#[must_use]
pub fn calculate_brand_health_score(
    analysis: &CompleteBrandAnalysis,
    history: Option<&[HealthScoreSnapshot]>,
) -> BrandHealthScore {
    calculate_brand_health_score_at(analysis, history, Utc::now())
}

/// Same as [`calculate_brand_health_score`] with an explicit calculation time.
///
/// Identical arguments always produce an identical result.
#[must_use]
pub fn calculate_brand_health_score_at(
    analysis: &CompleteBrandAnalysis,
    history: Option<&[HealthScoreSnapshot]>,
    calculated_at: DateTime<Utc>,
) -> BrandHealthScore {
    let marba = score_marba(analysis);
    let mirror = score_mirror(analysis);

    let blended = MARBA_SHARE * marba.weighted_total() + MIRROR_SHARE * mirror.weighted_total();
    let total = to_score(blended);

    BrandHealthScore {
        total,
        status: status_for(f64::from(total)),
        marba_breakdown: marba,
        mirror_breakdown: mirror,
        category_details: category_details(&marba),
        insights: insights(&marba),
        last_calculated: calculated_at,
        trend: Some(trend(total, history.unwrap_or(&[]))),
    }
}

/// Four-tier status; thresholds are inclusive lower bounds.
#[must_use]
pub fn status_for(score: f64) -> HealthStatus {
    if score >= 85.0 {
        HealthStatus::Excellent
    } else if score >= 70.0 {
        HealthStatus::Good
    } else if score >= 50.0 {
        HealthStatus::Fair
    } else {
        HealthStatus::NeedsWork
    }
}

fn category_details(marba: &MarbaScores) -> Vec<ScoreBreakdown> {
    MarbaCategory::ALL
        .iter()
        .map(|&category| {
            let score = marba.get(category);
            ScoreBreakdown {
                category,
                label: category.label().to_string(),
                score,
                status: status_for(score),
                weight: category.weight(),
            }
        })
        .collect()
}

fn insights(marba: &MarbaScores) -> Vec<ScoreInsight> {
    MarbaCategory::ALL
        .iter()
        .filter_map(|&category| {
            let score = marba.get(category);
            let kind = insight_kind(score)?;
            Some(ScoreInsight {
                kind,
                category,
                message: insight_message(category, kind, score),
            })
        })
        .collect()
}

/// Scores in `[70, 85)` are healthy but unremarkable and produce no insight.
fn insight_kind(score: f64) -> Option<InsightKind> {
    if score >= 85.0 {
        Some(InsightKind::Strength)
    } else if score >= 70.0 {
        None
    } else if score >= 50.0 {
        Some(InsightKind::Opportunity)
    } else {
        Some(InsightKind::Warning)
    }
}

fn insight_message(category: MarbaCategory, kind: InsightKind, score: f64) -> String {
    let label = category.label();
    match kind {
        InsightKind::Strength => {
            format!(
                "{label} is a clear strength at {score:.0}/100; keep it consistent across channels"
            )
        }
        InsightKind::Opportunity => {
            format!("{label} scores {score:.0}/100; {}", improvement_hint(category))
        }
        InsightKind::Warning => format!(
            "{label} needs attention at {score:.0}/100; {}",
            improvement_hint(category)
        ),
    }
}

fn improvement_hint(category: MarbaCategory) -> &'static str {
    match category {
        MarbaCategory::Messaging => {
            "sharpen the value proposition and add clear calls to action"
        }
        MarbaCategory::Audience => "define more personas and an explicit target statement",
        MarbaCategory::Reviews => "grow review volume and engagement with existing customers",
        MarbaCategory::Brand => "complete the visual identity and commit to one archetype",
        MarbaCategory::Ads => "tighten ad consistency and test higher-engagement creative",
    }
}

fn trend(total: u8, history: &[HealthScoreSnapshot]) -> ScoreTrend {
    let latest = history
        .iter()
        .max_by(|a, b| a.calculated_at.cmp(&b.calculated_at));

    match latest {
        None => ScoreTrend {
            previous_score: total,
            change: 0,
            period: FIRST_CALCULATION_PERIOD.to_string(),
        },
        Some(previous) => ScoreTrend {
            previous_score: previous.score,
            change: i16::from(total) - i16::from(previous.score),
            period: TREND_PERIOD.to_string(),
        },
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
#[path = "blend_test.rs"]
mod tests;
