//! MARBA category scoring: Messaging, Audience, Reviews, Brand, Ads.
//!
//! Each category is a sum of fixed point awards against thresholds in the
//! analysis payload, capped at 100.

use crate::types::{
    AudienceAnalysis, BrandMetrics, CompleteBrandAnalysis, IdentityAnalysis, MarbaScores,
    MessagingAnalysis,
};

const CATEGORY_CAP: f64 = 100.0;

/// Positioning statements longer than this many characters earn full credit.
const STRONG_POSITIONING_CHARS: usize = 50;

/// Score all five MARBA categories.
#[must_use]
pub fn score_marba(analysis: &CompleteBrandAnalysis) -> MarbaScores {
    MarbaScores {
        messaging: messaging_score(&analysis.messaging),
        audience: audience_score(&analysis.audience),
        reviews: reviews_score(&analysis.metrics),
        brand: brand_score(&analysis.identity, &analysis.metrics),
        ads: ads_score(&analysis.metrics),
    }
}

pub(crate) fn messaging_score(messaging: &MessagingAnalysis) -> f64 {
    let mut score = 0.0;

    if is_present(messaging.value_proposition.as_deref()) {
        score += 25.0;
    } else if !messaging.differentiators.is_empty() {
        score += 15.0;
    }

    score += tiered(messaging.voice_consistency, (80.0, 25.0), (60.0, 15.0));

    // Presence ignores surrounding whitespace; length counts the raw statement.
    match messaging.positioning_statement.as_deref() {
        Some(s) if s.trim().is_empty() => {}
        Some(s) if s.chars().count() > STRONG_POSITIONING_CHARS => score += 25.0,
        Some(_) => score += 15.0,
        None => {}
    }

    let cta_themes = messaging.themes.iter().filter(|t| t.call_to_action).count();
    if cta_themes >= 3 {
        score += 25.0;
    } else if cta_themes >= 1 {
        score += 15.0;
    }

    cap(score)
}

pub(crate) fn audience_score(audience: &AudienceAnalysis) -> f64 {
    let mut score = 0.0;

    match audience.personas.len() {
        0 => {}
        1 => score += 20.0,
        _ => score += 35.0,
    }

    score += tiered(audience.industry_confidence, (85.0, 35.0), (70.0, 20.0));

    if is_present(audience.target_statement.as_deref()) {
        score += 30.0;
    }

    cap(score)
}

/// Review presence and response activity are not measured yet; both are
/// credited as flat assumptions.
pub(crate) fn reviews_score(metrics: &BrandMetrics) -> f64 {
    let mut score = tiered(metrics.engagement, (80.0, 40.0), (60.0, 25.0));
    score += 20.0;
    score += 15.0;
    cap(score)
}

pub(crate) fn brand_score(identity: &IdentityAnalysis, metrics: &BrandMetrics) -> f64 {
    let mut score = 0.0;

    if let Some(top) = top_archetype_score(identity) {
        score += tiered(top, (80.0, 35.0), (60.0, 20.0));
    }

    let has_logo = is_present(identity.logo_url.as_deref());
    let has_colors = !identity.colors.is_empty();
    let has_fonts = !identity.fonts.is_empty();
    if has_logo && has_colors && has_fonts {
        score += 35.0;
    } else if has_logo || has_colors {
        score += 20.0;
    }

    score += tiered(metrics.clarity, (80.0, 30.0), (60.0, 15.0));

    cap(score)
}

pub(crate) fn ads_score(metrics: &BrandMetrics) -> f64 {
    let mut score = 25.0;
    score += tiered(metrics.engagement, (75.0, 30.0), (50.0, 15.0));
    score += tiered(metrics.consistency, (80.0, 30.0), (60.0, 15.0));
    cap(score)
}

/// Highest archetype score, or `None` when no archetypes were detected.
pub(crate) fn top_archetype_score(identity: &IdentityAnalysis) -> Option<f64> {
    identity
        .archetypes
        .iter()
        .map(|a| a.score)
        .fold(None, |best, s| match best {
            Some(b) if b >= s => Some(b),
            _ => Some(s),
        })
}

/// Award `high.1` when `value >= high.0`, else `low.1` when `value >= low.0`.
fn tiered(value: f64, high: (f64, f64), low: (f64, f64)) -> f64 {
    if value >= high.0 {
        high.1
    } else if value >= low.0 {
        low.1
    } else {
        0.0
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

fn cap(score: f64) -> f64 {
    score.min(CATEGORY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArchetypeScore, MessagingTheme, Persona};

    fn theme(name: &str, call_to_action: bool) -> MessagingTheme {
        MessagingTheme {
            name: name.to_string(),
            call_to_action,
        }
    }

    fn metrics(engagement: f64, consistency: f64, clarity: f64) -> BrandMetrics {
        BrandMetrics {
            engagement,
            consistency,
            clarity,
        }
    }

    #[test]
    fn messaging_full_marks() {
        let messaging = MessagingAnalysis {
            value_proposition: Some("Fresh roasted beans delivered weekly".to_string()),
            differentiators: vec![],
            voice_consistency: 90.0,
            positioning_statement: Some("x".repeat(60)),
            themes: vec![
                theme("Order today", true),
                theme("Join the club", true),
                theme("Visit the roastery", true),
            ],
        };
        assert!((messaging_score(&messaging) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn messaging_zero_when_nothing_is_present() {
        let messaging = MessagingAnalysis {
            value_proposition: None,
            differentiators: vec![],
            voice_consistency: 55.0,
            positioning_statement: None,
            themes: vec![],
        };
        assert!(messaging_score(&messaging).abs() < f64::EPSILON);
    }

    #[test]
    fn messaging_partial_credit_tiers() {
        let messaging = MessagingAnalysis {
            value_proposition: Some("   ".to_string()),
            differentiators: vec!["Single origin".to_string()],
            voice_consistency: 60.0,
            positioning_statement: Some("Short statement".to_string()),
            themes: vec![theme("Buy now", true), theme("Our story", false)],
        };
        // 15 (differentiator) + 15 (consistency) + 15 (short statement) + 15 (one CTA)
        assert!((messaging_score(&messaging) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn positioning_length_counts_surrounding_whitespace() {
        let messaging = MessagingAnalysis {
            value_proposition: None,
            differentiators: vec![],
            voice_consistency: 0.0,
            positioning_statement: Some(format!("  {}  ", "z".repeat(48))),
            themes: vec![],
        };
        assert!((messaging_score(&messaging) - 25.0).abs() < f64::EPSILON);

        let blank = MessagingAnalysis {
            positioning_statement: Some(" ".repeat(60)),
            ..messaging
        };
        assert!(messaging_score(&blank).abs() < f64::EPSILON);
    }

    #[test]
    fn positioning_length_boundary_is_exclusive_at_fifty() {
        let mut messaging = MessagingAnalysis {
            value_proposition: None,
            differentiators: vec![],
            voice_consistency: 0.0,
            positioning_statement: Some("y".repeat(50)),
            themes: vec![],
        };
        assert!((messaging_score(&messaging) - 15.0).abs() < f64::EPSILON);

        messaging.positioning_statement = Some("y".repeat(51));
        assert!((messaging_score(&messaging) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn audience_scores_personas_confidence_and_statement() {
        let audience = AudienceAnalysis {
            personas: vec![
                Persona {
                    name: "Commuter".to_string(),
                    description: None,
                },
                Persona {
                    name: "Home brewer".to_string(),
                    description: None,
                },
            ],
            industry_confidence: 85.0,
            target_statement: Some("Busy professionals who care about quality".to_string()),
        };
        assert!((audience_score(&audience) - 100.0).abs() < f64::EPSILON);

        let thin = AudienceAnalysis {
            personas: vec![Persona {
                name: "Commuter".to_string(),
                description: None,
            }],
            industry_confidence: 70.0,
            target_statement: None,
        };
        assert!((audience_score(&thin) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reviews_has_flat_baseline() {
        assert!((reviews_score(&metrics(0.0, 0.0, 0.0)) - 35.0).abs() < f64::EPSILON);
        assert!((reviews_score(&metrics(60.0, 0.0, 0.0)) - 60.0).abs() < f64::EPSILON);
        assert!((reviews_score(&metrics(80.0, 0.0, 0.0)) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn brand_requires_all_three_assets_for_full_identity_credit() {
        let mut identity = IdentityAnalysis {
            archetypes: vec![
                ArchetypeScore {
                    name: "Caregiver".to_string(),
                    score: 62.0,
                },
                ArchetypeScore {
                    name: "Explorer".to_string(),
                    score: 84.0,
                },
            ],
            logo_url: Some("https://cdn.example.com/logo.svg".to_string()),
            colors: vec!["#112233".to_string()],
            fonts: vec!["Inter".to_string()],
        };
        let m = metrics(0.0, 0.0, 80.0);
        assert!((brand_score(&identity, &m) - 100.0).abs() < f64::EPSILON);

        identity.fonts.clear();
        assert!((brand_score(&identity, &m) - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn brand_without_archetypes_or_assets_scores_only_clarity() {
        let identity = IdentityAnalysis {
            archetypes: vec![],
            logo_url: None,
            colors: vec![],
            fonts: vec!["Inter".to_string()],
        };
        assert!((brand_score(&identity, &metrics(0.0, 0.0, 65.0)) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ads_tiers() {
        assert!((ads_score(&metrics(0.0, 0.0, 0.0)) - 25.0).abs() < f64::EPSILON);
        assert!((ads_score(&metrics(50.0, 60.0, 0.0)) - 55.0).abs() < f64::EPSILON);
        assert!((ads_score(&metrics(75.0, 80.0, 0.0)) - 85.0).abs() < f64::EPSILON);
    }
}
