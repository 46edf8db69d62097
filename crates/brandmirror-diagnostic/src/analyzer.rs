//! The sub-analyzer seam.

use async_trait::async_trait;
use brandmirror_core::{BrandData, SubAnalysisResult};

use crate::error::AnalyzerError;

/// One independent analysis of a brand, producing a score and typed payload.
///
/// Implementations should not retry or fall back themselves; the
/// orchestrator owns timeouts and fallback substitution.
#[async_trait]
pub trait SubAnalyzer: Send + Sync {
    type Data: Send;

    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        brand_id: i64,
        brand: &BrandData,
    ) -> Result<SubAnalysisResult<Self::Data>, AnalyzerError>;
}
