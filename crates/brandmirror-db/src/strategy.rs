//! Strategy milestones: `value_propositions` and `buyer_journeys`.
//!
//! A diagnostic run only consumes these as booleans; the statement text is
//! read back when a completed value proposition is compared against delivery.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `value_propositions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ValuePropositionRow {
    pub id: i64,
    pub brand_id: i64,
    pub statement: String,
    pub is_complete: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `true` if the brand has a completed value proposition on file.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn has_completed_uvp(pool: &PgPool, brand_id: i64) -> Result<bool, DbError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (\
           SELECT 1 FROM value_propositions WHERE brand_id = $1 AND is_complete = true\
         )",
    )
    .bind(brand_id)
    .fetch_one(pool)
    .await?)
}

/// `true` if the brand has a completed buyer journey on file.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn has_buyer_journey(pool: &PgPool, brand_id: i64) -> Result<bool, DbError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (\
           SELECT 1 FROM buyer_journeys WHERE brand_id = $1 AND is_complete = true\
         )",
    )
    .bind(brand_id)
    .fetch_one(pool)
    .await?)
}

/// The brand's value proposition, only if it has been marked complete.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_completed_value_proposition(
    pool: &PgPool,
    brand_id: i64,
) -> Result<Option<ValuePropositionRow>, DbError> {
    Ok(sqlx::query_as::<_, ValuePropositionRow>(
        "SELECT id, brand_id, statement, is_complete, completed_at, created_at, updated_at \
         FROM value_propositions \
         WHERE brand_id = $1 AND is_complete = true",
    )
    .bind(brand_id)
    .fetch_optional(pool)
    .await?)
}

/// Record a value proposition statement for a brand.
///
/// `completed_at` is stamped the first time `is_complete` becomes true and
/// cleared when the proposition is reopened.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_value_proposition(
    pool: &PgPool,
    brand_id: i64,
    statement: &str,
    is_complete: bool,
) -> Result<ValuePropositionRow, DbError> {
    Ok(sqlx::query_as::<_, ValuePropositionRow>(
        "INSERT INTO value_propositions (brand_id, statement, is_complete, completed_at) \
         VALUES ($1, $2, $3, CASE WHEN $3 THEN NOW() END) \
         ON CONFLICT (brand_id) DO UPDATE SET \
           statement    = EXCLUDED.statement, \
           is_complete  = EXCLUDED.is_complete, \
           completed_at = CASE \
                            WHEN NOT EXCLUDED.is_complete THEN NULL \
                            ELSE COALESCE(value_propositions.completed_at, NOW()) \
                          END, \
           updated_at   = NOW() \
         RETURNING id, brand_id, statement, is_complete, completed_at, created_at, updated_at",
    )
    .bind(brand_id)
    .bind(statement)
    .bind(is_complete)
    .fetch_one(pool)
    .await?)
}

/// Mark the brand's buyer journey complete, creating the row if needed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn complete_buyer_journey(pool: &PgPool, brand_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO buyer_journeys (brand_id, is_complete, completed_at) \
         VALUES ($1, true, NOW()) \
         ON CONFLICT (brand_id) DO UPDATE SET \
           is_complete  = true, \
           completed_at = COALESCE(buyer_journeys.completed_at, NOW()), \
           updated_at   = NOW()",
    )
    .bind(brand_id)
    .execute(pool)
    .await?;
    Ok(())
}
