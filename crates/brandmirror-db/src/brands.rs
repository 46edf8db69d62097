//! Database operations for the `brands` table.

use brandmirror_core::BrandData;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub target_audience: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BrandRow {
    /// The analyzer-facing view of this brand.
    #[must_use]
    pub fn brand_data(&self) -> BrandData {
        BrandData {
            name: self.name.clone(),
            industry: self.industry.clone(),
            location: self.location.clone(),
            target_audience: self.target_audience.clone(),
        }
    }
}

const BRAND_COLUMNS: &str = "id, name, slug, industry, location, target_audience, \
                             is_active, created_at, updated_at, deleted_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active, non-deleted brands, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands \
         WHERE is_active = true AND deleted_at IS NULL \
         ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active, non-deleted brand by slug, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands \
         WHERE slug = $1 AND is_active = true AND deleted_at IS NULL"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a single active, non-deleted brand by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_id(pool: &PgPool, id: i64) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands \
         WHERE id = $1 AND is_active = true AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a brand or updates the existing row with the same slug.
///
/// An upsert re-activates a soft-deleted brand.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_brand(
    pool: &PgPool,
    slug: &str,
    brand: &BrandData,
) -> Result<BrandRow, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "INSERT INTO brands (name, slug, industry, location, target_audience) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (slug) DO UPDATE SET \
           name            = EXCLUDED.name, \
           industry        = EXCLUDED.industry, \
           location        = EXCLUDED.location, \
           target_audience = EXCLUDED.target_audience, \
           is_active       = true, \
           deleted_at      = NULL, \
           updated_at      = NOW() \
         RETURNING {BRAND_COLUMNS}"
    ))
    .bind(&brand.name)
    .bind(slug)
    .bind(brand.industry.as_deref())
    .bind(brand.location.as_deref())
    .bind(brand.target_audience.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
