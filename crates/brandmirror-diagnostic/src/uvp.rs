//! UVP delivery analysis.

use brandmirror_core::UvpDeliveryAnalysis;
use chrono::{DateTime, Utc};

pub const NEUTRAL_DELIVERY_SCORE: u8 = 50;
pub const PENDING_ALIGNMENT: &str = "pending";

/// Placeholder delivery analysis for a newly completed value proposition.
///
/// Delivery is not measured against customer evidence yet, so the promise is
/// recorded with a neutral score and no confirmations or gaps.
#[must_use]
pub fn neutral_delivery_analysis(
    uvp_promise: &str,
    analyzed_at: DateTime<Utc>,
) -> UvpDeliveryAnalysis {
    UvpDeliveryAnalysis {
        uvp_promise: uvp_promise.trim().to_string(),
        delivery_score: NEUTRAL_DELIVERY_SCORE,
        alignment: PENDING_ALIGNMENT.to_string(),
        customer_confirmations: Vec::new(),
        gaps: Vec::new(),
        analyzed_at,
    }
}
