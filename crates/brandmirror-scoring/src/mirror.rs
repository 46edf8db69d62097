//! Mirror framework scoring: Golden Circle, Archetype, Tone, Competitive.

use crate::marba::top_archetype_score;
use crate::types::{
    CompetitiveAnalysis, CompleteBrandAnalysis, GoldenCircle, MirrorScores, ToneProfile,
};

/// Competitive score used when no competitive analysis exists at all.
const NO_COMPETITIVE_DATA_SCORE: f64 = 50.0;

#[must_use]
pub fn score_mirror(analysis: &CompleteBrandAnalysis) -> MirrorScores {
    MirrorScores {
        golden_circle: golden_circle_score(&analysis.golden_circle),
        archetype: bounded(top_archetype_score(&analysis.identity).unwrap_or(0.0)),
        tone: tone_score(&analysis.tone),
        competitive: competitive_score(analysis.competitive.as_ref()),
    }
}

fn golden_circle_score(circle: &GoldenCircle) -> f64 {
    bounded((circle.why_score + circle.how_score + circle.what_score) / 3.0)
}

fn tone_score(tone: &ToneProfile) -> f64 {
    if tone.dimensions.is_empty() {
        return 0.0;
    }
    let sum: f64 = tone.dimensions.values().sum();
    #[allow(clippy::cast_precision_loss)]
    let count = tone.dimensions.len() as f64;
    bounded(sum / count)
}

fn competitive_score(competitive: Option<&CompetitiveAnalysis>) -> f64 {
    let Some(competitive) = competitive else {
        return NO_COMPETITIVE_DATA_SCORE;
    };

    let mut score = 0.0;
    if !competitive.scorecards.is_empty() {
        score += 40.0;
    }
    if !competitive.strategic_insights.is_empty() {
        score += 30.0;
    }
    if competitive
        .summary
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty())
    {
        score += 30.0;
    }
    score
}

fn bounded(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
