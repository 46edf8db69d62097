//! Persistence seams for the orchestrator and their Postgres implementations.

use async_trait::async_trait;
use brandmirror_core::{MirrorDiagnostic, MirrorDiagnosticDraft, UvpDeliveryAnalysis};
use brandmirror_db::{MirrorDiagnosticRow, NewMirrorDiagnostic};
use sqlx::PgPool;

use crate::error::StoreError;

/// Where diagnostics of record live.
#[async_trait]
pub trait DiagnosticStore: Send + Sync {
    async fn load_latest(&self, brand_id: i64) -> Result<Option<MirrorDiagnostic>, StoreError>;

    /// Create or overwrite the brand's single diagnostic in one atomic step
    /// and return it as stored.
    async fn upsert(&self, draft: &MirrorDiagnosticDraft) -> Result<MirrorDiagnostic, StoreError>;

    /// Set the UVP delivery analysis and `has_completed_uvp`; nothing else changes.
    async fn update_uvp_delivery(
        &self,
        brand_id: i64,
        analysis: &UvpDeliveryAnalysis,
    ) -> Result<MirrorDiagnostic, StoreError>;
}

/// Read-only view of a brand's strategy milestones.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn has_completed_uvp(&self, brand_id: i64) -> Result<bool, StoreError>;

    async fn has_buyer_journey(&self, brand_id: i64) -> Result<bool, StoreError>;

    /// The completed value proposition statement, if any.
    async fn completed_value_proposition(
        &self,
        brand_id: i64,
    ) -> Result<Option<String>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgDiagnosticStore {
    pool: PgPool,
}

impl PgDiagnosticStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiagnosticStore for PgDiagnosticStore {
    async fn load_latest(&self, brand_id: i64) -> Result<Option<MirrorDiagnostic>, StoreError> {
        let row = brandmirror_db::get_diagnostic_by_brand(&self.pool, brand_id).await?;
        Ok(row.map(MirrorDiagnosticRow::into_diagnostic).transpose()?)
    }

    async fn upsert(&self, draft: &MirrorDiagnosticDraft) -> Result<MirrorDiagnostic, StoreError> {
        let new = NewMirrorDiagnostic::from_draft(draft)?;
        let row = brandmirror_db::upsert_diagnostic(&self.pool, &new).await?;
        Ok(row.into_diagnostic()?)
    }

    async fn update_uvp_delivery(
        &self,
        brand_id: i64,
        analysis: &UvpDeliveryAnalysis,
    ) -> Result<MirrorDiagnostic, StoreError> {
        let row =
            brandmirror_db::update_uvp_delivery_analysis(&self.pool, brand_id, analysis).await?;
        Ok(row.into_diagnostic()?)
    }
}

#[derive(Debug, Clone)]
pub struct PgStrategyStore {
    pool: PgPool,
}

impl PgStrategyStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StrategyStore for PgStrategyStore {
    async fn has_completed_uvp(&self, brand_id: i64) -> Result<bool, StoreError> {
        Ok(brandmirror_db::has_completed_uvp(&self.pool, brand_id).await?)
    }

    async fn has_buyer_journey(&self, brand_id: i64) -> Result<bool, StoreError> {
        Ok(brandmirror_db::has_buyer_journey(&self.pool, brand_id).await?)
    }

    async fn completed_value_proposition(
        &self,
        brand_id: i64,
    ) -> Result<Option<String>, StoreError> {
        let row = brandmirror_db::get_completed_value_proposition(&self.pool, brand_id).await?;
        Ok(row.map(|r| r.statement))
    }
}
