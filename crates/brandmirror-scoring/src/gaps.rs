//! Critical gap identification.
//!
//! Rules run in a fixed order and gaps are numbered in the order they are
//! found. Visibility is checked for every brand; the remaining rules only
//! apply once the brand has completed its value proposition. The list is cut
//! to [`MAX_CRITICAL_GAPS`] by insertion order, not severity.

use brandmirror_core::{BrandFitData, CriticalGap, CustomerTruthData, MarketPositionData};

pub const MAX_CRITICAL_GAPS: usize = 3;

const VISIBLE_RANK_CUTOFF: u32 = 5;
const MIN_AUDIENCE_MATCH: f64 = 50.0;
const MIN_MESSAGING_CONSISTENCY: f64 = 60.0;
const MIN_DIFFERENTIATION: f64 = 50.0;

/// Derive up to three prioritized gaps from the sub-analysis payloads.
#[must_use]
pub fn identify_critical_gaps(
    market: &MarketPositionData,
    customer: &CustomerTruthData,
    brand_fit: &BrandFitData,
    has_completed_uvp: bool,
) -> Vec<CriticalGap> {
    let mut found: Vec<GapTemplate> = Vec::new();

    if market.current_rank > VISIBLE_RANK_CUTOFF {
        found.push(low_visibility(market));
    }

    if has_completed_uvp {
        if customer.competes_on_price() {
            found.push(price_competition(customer));
        }
        if customer.match_percentage < MIN_AUDIENCE_MATCH {
            found.push(audience_misalignment(customer));
        }
        if brand_fit.messaging_consistency < MIN_MESSAGING_CONSISTENCY {
            found.push(inconsistent_messaging(brand_fit));
        }
        if brand_fit.differentiation_score < MIN_DIFFERENTIATION {
            found.push(weak_differentiation(brand_fit));
        }
    }

    found
        .into_iter()
        .take(MAX_CRITICAL_GAPS)
        .zip(1_u8..)
        .map(|(template, priority)| template.into_gap(priority))
        .collect()
}

struct GapTemplate {
    gap: String,
    impact: String,
    fix: String,
    fix_action_link: &'static str,
}

impl GapTemplate {
    fn into_gap(self, priority: u8) -> CriticalGap {
        CriticalGap {
            priority,
            gap: self.gap,
            impact: self.impact,
            fix: self.fix,
            fix_action_link: self.fix_action_link.to_string(),
        }
    }
}

fn low_visibility(market: &MarketPositionData) -> GapTemplate {
    GapTemplate {
        gap: format!(
            "Low visibility: ranked #{} of {} competitors",
            market.current_rank, market.total_competitors
        ),
        impact: "Customers searching your category find competitors before they find you"
            .to_string(),
        fix: "Improve local search presence and claim the listings competitors already rank with"
            .to_string(),
        fix_action_link: "/mirror/optimize?focus=visibility",
    }
}

fn price_competition(customer: &CustomerTruthData) -> GapTemplate {
    GapTemplate {
        gap: "Competing on price, not value".to_string(),
        impact: format!(
            "Customers describe you as \"{}\", which erodes margin and loyalty",
            customer.price_vs_value_perception.trim()
        ),
        fix: "Lead messaging with the outcomes your value proposition promises instead of price"
            .to_string(),
        fix_action_link: "/strategy/uvp?focus=value",
    }
}

fn audience_misalignment(customer: &CustomerTruthData) -> GapTemplate {
    GapTemplate {
        gap: "Target audience misalignment".to_string(),
        impact: format!(
            "Only {:.0}% of reviewers match the audience you are targeting",
            customer.match_percentage
        ),
        fix: "Revisit your buyer personas or retarget campaigns toward the customers who actually buy"
            .to_string(),
        fix_action_link: "/strategy/buyer-journey",
    }
}

fn inconsistent_messaging(brand_fit: &BrandFitData) -> GapTemplate {
    GapTemplate {
        gap: "Inconsistent messaging".to_string(),
        impact: format!(
            "Messaging consistency is {:.0}/100; customers hear a different story on each channel",
            brand_fit.messaging_consistency
        ),
        fix: "Align every touchpoint on one core message derived from your value proposition"
            .to_string(),
        fix_action_link: "/mirror/optimize?focus=messaging",
    }
}

fn weak_differentiation(brand_fit: &BrandFitData) -> GapTemplate {
    GapTemplate {
        gap: "Weak differentiation".to_string(),
        impact: format!(
            "Differentiation is {:.0}/100; customers cannot tell you apart from alternatives",
            brand_fit.differentiation_score
        ),
        fix: "Name the one thing only you do and repeat it everywhere".to_string(),
        fix_action_link: "/strategy/uvp?focus=differentiation",
    }
}
