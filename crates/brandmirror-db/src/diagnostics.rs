//! Database operations for `mirror_diagnostics`.
//!
//! Each brand owns at most one row. Writes go through a single
//! `INSERT ... ON CONFLICT (brand_id) DO UPDATE` so concurrent runs for the
//! same brand converge on one record instead of racing a read-then-write.

use brandmirror_core::{MirrorDiagnostic, MirrorDiagnosticDraft, UvpDeliveryAnalysis};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `mirror_diagnostics` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MirrorDiagnosticRow {
    pub id: i64,
    pub brand_id: i64,
    pub market_position_score: i16,
    pub customer_match_score: i16,
    pub brand_clarity_score: i16,
    pub overall_health_score: i16,
    pub market_position_data: Value,
    pub customer_truth_data: Value,
    pub brand_fit_data: Value,
    pub critical_gaps: Value,
    pub uvp_delivery_analysis: Option<Value>,
    pub has_completed_uvp: bool,
    pub has_buyer_journey: bool,
    pub analyzed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MirrorDiagnosticRow {
    /// Decode the JSONB payloads into the typed diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Json`] naming the first column that fails to decode.
    pub fn into_diagnostic(self) -> Result<MirrorDiagnostic, DbError> {
        Ok(MirrorDiagnostic {
            id: self.id,
            brand_id: self.brand_id,
            market_position_score: score_from_column(self.market_position_score),
            customer_match_score: score_from_column(self.customer_match_score),
            brand_clarity_score: score_from_column(self.brand_clarity_score),
            overall_health_score: score_from_column(self.overall_health_score),
            market_position_data: decode("market_position_data", self.market_position_data)?,
            customer_truth_data: decode("customer_truth_data", self.customer_truth_data)?,
            brand_fit_data: decode("brand_fit_data", self.brand_fit_data)?,
            critical_gaps: decode("critical_gaps", self.critical_gaps)?,
            uvp_delivery_analysis: self
                .uvp_delivery_analysis
                .map(|v| decode("uvp_delivery_analysis", v))
                .transpose()?,
            has_completed_uvp: self.has_completed_uvp,
            has_buyer_journey: self.has_buyer_journey,
            analyzed_at: self.analyzed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Column values for an upsert, with payloads already encoded as JSON.
#[derive(Debug, Clone)]
pub struct NewMirrorDiagnostic {
    pub brand_id: i64,
    pub market_position_score: i16,
    pub customer_match_score: i16,
    pub brand_clarity_score: i16,
    pub overall_health_score: i16,
    pub market_position_data: Value,
    pub customer_truth_data: Value,
    pub brand_fit_data: Value,
    pub critical_gaps: Value,
    pub uvp_delivery_analysis: Option<Value>,
    pub has_completed_uvp: bool,
    pub has_buyer_journey: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl NewMirrorDiagnostic {
    /// Encode a computed draft into column values.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Json`] if a payload cannot be serialized.
    pub fn from_draft(draft: &MirrorDiagnosticDraft) -> Result<Self, DbError> {
        Ok(Self {
            brand_id: draft.brand_id,
            market_position_score: i16::from(draft.market_position_score),
            customer_match_score: i16::from(draft.customer_match_score),
            brand_clarity_score: i16::from(draft.brand_clarity_score),
            overall_health_score: i16::from(draft.overall_health_score),
            market_position_data: encode("market_position_data", &draft.market_position_data)?,
            customer_truth_data: encode("customer_truth_data", &draft.customer_truth_data)?,
            brand_fit_data: encode("brand_fit_data", &draft.brand_fit_data)?,
            critical_gaps: encode("critical_gaps", &draft.critical_gaps)?,
            uvp_delivery_analysis: draft
                .uvp_delivery_analysis
                .as_ref()
                .map(|u| encode("uvp_delivery_analysis", u))
                .transpose()?,
            has_completed_uvp: draft.has_completed_uvp,
            has_buyer_journey: draft.has_buyer_journey,
            analyzed_at: draft.analyzed_at,
        })
    }
}

const DIAGNOSTIC_COLUMNS: &str = "id, brand_id, market_position_score, customer_match_score, \
     brand_clarity_score, overall_health_score, market_position_data, customer_truth_data, \
     brand_fit_data, critical_gaps, uvp_delivery_analysis, has_completed_uvp, has_buyer_journey, \
     analyzed_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// The brand's diagnostic of record, if one has been computed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_diagnostic_by_brand(
    pool: &PgPool,
    brand_id: i64,
) -> Result<Option<MirrorDiagnosticRow>, DbError> {
    Ok(sqlx::query_as::<_, MirrorDiagnosticRow>(&format!(
        "SELECT {DIAGNOSTIC_COLUMNS} FROM mirror_diagnostics WHERE brand_id = $1"
    ))
    .bind(brand_id)
    .fetch_optional(pool)
    .await?)
}

/// Insert the brand's diagnostic or overwrite the existing one in place.
///
/// `id` and `created_at` survive an overwrite; `updated_at` is bumped.
/// Returns the row as stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails, including a missing brand
/// (foreign key) or a gap list longer than three (check constraint).
pub async fn upsert_diagnostic(
    pool: &PgPool,
    diagnostic: &NewMirrorDiagnostic,
) -> Result<MirrorDiagnosticRow, DbError> {
    Ok(sqlx::query_as::<_, MirrorDiagnosticRow>(&format!(
        "INSERT INTO mirror_diagnostics \
           (brand_id, market_position_score, customer_match_score, brand_clarity_score, \
            overall_health_score, market_position_data, customer_truth_data, brand_fit_data, \
            critical_gaps, uvp_delivery_analysis, has_completed_uvp, has_buyer_journey, analyzed_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT (brand_id) DO UPDATE SET \
           market_position_score = EXCLUDED.market_position_score, \
           customer_match_score  = EXCLUDED.customer_match_score, \
           brand_clarity_score   = EXCLUDED.brand_clarity_score, \
           overall_health_score  = EXCLUDED.overall_health_score, \
           market_position_data  = EXCLUDED.market_position_data, \
           customer_truth_data   = EXCLUDED.customer_truth_data, \
           brand_fit_data        = EXCLUDED.brand_fit_data, \
           critical_gaps         = EXCLUDED.critical_gaps, \
           uvp_delivery_analysis = EXCLUDED.uvp_delivery_analysis, \
           has_completed_uvp     = EXCLUDED.has_completed_uvp, \
           has_buyer_journey     = EXCLUDED.has_buyer_journey, \
           analyzed_at           = EXCLUDED.analyzed_at, \
           updated_at            = NOW() \
         RETURNING {DIAGNOSTIC_COLUMNS}"
    ))
    .bind(diagnostic.brand_id)
    .bind(diagnostic.market_position_score)
    .bind(diagnostic.customer_match_score)
    .bind(diagnostic.brand_clarity_score)
    .bind(diagnostic.overall_health_score)
    .bind(&diagnostic.market_position_data)
    .bind(&diagnostic.customer_truth_data)
    .bind(&diagnostic.brand_fit_data)
    .bind(&diagnostic.critical_gaps)
    .bind(diagnostic.uvp_delivery_analysis.as_ref())
    .bind(diagnostic.has_completed_uvp)
    .bind(diagnostic.has_buyer_journey)
    .bind(diagnostic.analyzed_at)
    .fetch_one(pool)
    .await?)
}

/// Set the UVP delivery analysis and mark the UVP complete, leaving scores,
/// payloads and gaps untouched.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the brand has no diagnostic, or
/// [`DbError::Json`] / [`DbError::Sqlx`] on encode or query failure.
pub async fn update_uvp_delivery_analysis(
    pool: &PgPool,
    brand_id: i64,
    analysis: &UvpDeliveryAnalysis,
) -> Result<MirrorDiagnosticRow, DbError> {
    let payload = encode("uvp_delivery_analysis", analysis)?;

    sqlx::query_as::<_, MirrorDiagnosticRow>(&format!(
        "UPDATE mirror_diagnostics SET \
           uvp_delivery_analysis = $2, \
           has_completed_uvp     = true, \
           updated_at            = NOW() \
         WHERE brand_id = $1 \
         RETURNING {DIAGNOSTIC_COLUMNS}"
    ))
    .bind(brand_id)
    .bind(&payload)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Ids of active brands that already have a diagnostic, oldest analysis first.
///
/// Used by the scheduler to pick refresh targets.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_ids_with_diagnostics(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT md.brand_id FROM mirror_diagnostics md \
         JOIN brands b ON b.id = md.brand_id \
         WHERE b.is_active = true AND b.deleted_at IS NULL \
         ORDER BY md.analyzed_at, md.brand_id",
    )
    .fetch_all(pool)
    .await?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// Scores are CHECK-constrained to 0..=100 in the schema.
fn score_from_column(value: i16) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or_default()
}

fn encode<T: serde::Serialize>(column: &'static str, value: &T) -> Result<Value, DbError> {
    serde_json::to_value(value).map_err(|source| DbError::Json { column, source })
}

fn decode<T: DeserializeOwned>(column: &'static str, value: Value) -> Result<T, DbError> {
    serde_json::from_value(value).map_err(|source| DbError::Json { column, source })
}
