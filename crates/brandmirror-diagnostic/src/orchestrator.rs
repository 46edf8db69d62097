//! Diagnostic orchestration: fan out to the sub-analyzers, settle every
//! result, derive gaps, and persist one record per brand.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use brandmirror_core::{
    overall_health_score, AppConfig, BrandData, BrandFitData, CustomerTruthData,
    MarketPositionData, MirrorDiagnostic, MirrorDiagnosticDraft, SubAnalysisResult,
};
use brandmirror_scoring::identify_critical_gaps;
use chrono::Utc;
use sqlx::PgPool;

use crate::analyzer::SubAnalyzer;
use crate::error::{AnalyzerError, DiagnosticError, StoreError};
use crate::http::HttpSubAnalyzer;
use crate::store::{DiagnosticStore, PgDiagnosticStore, PgStrategyStore, StrategyStore};
use crate::uvp::neutral_delivery_analysis;

/// The three analyzers a diagnostic run consults.
#[derive(Clone)]
pub struct Analyzers {
    pub market_position: Arc<dyn SubAnalyzer<Data = MarketPositionData>>,
    pub customer_truth: Arc<dyn SubAnalyzer<Data = CustomerTruthData>>,
    pub brand_fit: Arc<dyn SubAnalyzer<Data = BrandFitData>>,
}

impl Analyzers {
    /// HTTP analyzers for every endpoint in `config`. Unset endpoints still
    /// produce an analyzer; it always falls back.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalyzerError> {
        let market_position = HttpSubAnalyzer::<MarketPositionData>::market_position(config)?;
        let customer_truth = HttpSubAnalyzer::<CustomerTruthData>::customer_truth(config)?;
        let brand_fit = HttpSubAnalyzer::<BrandFitData>::brand_fit(config)?;

        for (name, configured) in [
            (market_position.name(), market_position.is_configured()),
            (customer_truth.name(), customer_truth.is_configured()),
            (brand_fit.name(), brand_fit.is_configured()),
        ] {
            if !configured {
                tracing::warn!(
                    analyzer = name,
                    "no endpoint configured; results will use fallback"
                );
            }
        }

        Ok(Self {
            market_position: Arc::new(market_position),
            customer_truth: Arc::new(customer_truth),
            brand_fit: Arc::new(brand_fit),
        })
    }
}

/// Runs, refreshes and enriches per-brand diagnostics.
///
/// Holds only injected collaborators; cheap to clone and share across tasks.
#[derive(Clone)]
pub struct DiagnosticOrchestrator {
    analyzers: Analyzers,
    diagnostics: Arc<dyn DiagnosticStore>,
    strategy: Arc<dyn StrategyStore>,
    analyzer_timeout: Duration,
}

impl DiagnosticOrchestrator {
    #[must_use]
    pub fn new(
        analyzers: Analyzers,
        diagnostics: Arc<dyn DiagnosticStore>,
        strategy: Arc<dyn StrategyStore>,
        analyzer_timeout: Duration,
    ) -> Self {
        Self {
            analyzers,
            diagnostics,
            strategy,
            analyzer_timeout,
        }
    }

    /// Production wiring: HTTP analyzers plus Postgres-backed stores.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, pool: PgPool) -> Result<Self, AnalyzerError> {
        Ok(Self::new(
            Analyzers::from_config(config)?,
            Arc::new(PgDiagnosticStore::new(pool.clone())),
            Arc::new(PgStrategyStore::new(pool)),
            Duration::from_secs(config.analyzer_timeout_secs),
        ))
    }

    /// Compute and persist a fresh diagnostic for the brand.
    ///
    /// Analyzer failures and timeouts degrade to neutral fallbacks; only a
    /// failed write is an error.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticError::Persistence`] if the upsert fails.
    pub async fn run_full_diagnostic(
        &self,
        brand_id: i64,
        brand: &BrandData,
    ) -> Result<MirrorDiagnostic, DiagnosticError> {
        tracing::info!(brand_id, brand = %brand.name, "running mirror diagnostic");
        self.execute(brand_id, brand).await
    }

    /// Re-run the diagnostic for a brand, overwriting its record.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticError::Persistence`] if the upsert fails.
    pub async fn refresh_diagnostic(
        &self,
        brand_id: i64,
        brand: &BrandData,
    ) -> Result<MirrorDiagnostic, DiagnosticError> {
        tracing::info!(brand_id, brand = %brand.name, "refreshing mirror diagnostic");
        self.execute(brand_id, brand).await
    }

    /// The brand's diagnostic of record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticError::Store`] if the lookup fails.
    pub async fn load_latest_diagnostic(
        &self,
        brand_id: i64,
    ) -> Result<Option<MirrorDiagnostic>, DiagnosticError> {
        Ok(self.diagnostics.load_latest(brand_id).await?)
    }

    /// Attach a UVP delivery analysis to an existing diagnostic.
    ///
    /// Returns `None` when the brand has no diagnostic. UVP completion is
    /// looked up fresh, so a UVP finished after the last run still counts; a
    /// failed lookup counts as incomplete. The record comes back unchanged
    /// while the UVP is incomplete or when no completed statement is on file.
    /// Scores and gaps are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticError::Store`] if loading the diagnostic, fetching
    /// the statement, or the update fails.
    pub async fn enhance_with_uvp(
        &self,
        brand_id: i64,
    ) -> Result<Option<MirrorDiagnostic>, DiagnosticError> {
        let Some(current) = self.diagnostics.load_latest(brand_id).await? else {
            return Ok(None);
        };

        let completed = milestone(
            "completed_uvp",
            brand_id,
            self.strategy.has_completed_uvp(brand_id),
        )
        .await;
        if !completed {
            tracing::debug!(brand_id, "UVP not completed; nothing to enhance");
            return Ok(Some(current));
        }

        let Some(promise) = self.strategy.completed_value_proposition(brand_id).await? else {
            tracing::warn!(brand_id, "UVP marked complete but no statement is on file");
            return Ok(Some(current));
        };

        let analysis = neutral_delivery_analysis(&promise, Utc::now());
        let updated = self.diagnostics.update_uvp_delivery(brand_id, &analysis).await?;
        tracing::info!(
            brand_id,
            delivery_score = analysis.delivery_score,
            "attached UVP delivery analysis"
        );
        Ok(Some(updated))
    }

    async fn execute(
        &self,
        brand_id: i64,
        brand: &BrandData,
    ) -> Result<MirrorDiagnostic, DiagnosticError> {
        let timeout = self.analyzer_timeout;
        let (market, customer, brand_fit) = tokio::join!(
            settle(
                self.analyzers.market_position.as_ref(),
                brand_id,
                brand,
                timeout,
                SubAnalysisResult::<MarketPositionData>::market_position_fallback,
            ),
            settle(
                self.analyzers.customer_truth.as_ref(),
                brand_id,
                brand,
                timeout,
                SubAnalysisResult::<CustomerTruthData>::customer_truth_fallback,
            ),
            settle(
                self.analyzers.brand_fit.as_ref(),
                brand_id,
                brand,
                timeout,
                SubAnalysisResult::<BrandFitData>::brand_fit_fallback,
            ),
        );

        let (has_completed_uvp, has_buyer_journey) = tokio::join!(
            milestone(
                "completed_uvp",
                brand_id,
                self.strategy.has_completed_uvp(brand_id)
            ),
            milestone(
                "buyer_journey",
                brand_id,
                self.strategy.has_buyer_journey(brand_id)
            ),
        );

        let critical_gaps = identify_critical_gaps(
            &market.data,
            &customer.data,
            &brand_fit.data,
            has_completed_uvp,
        );

        let draft = MirrorDiagnosticDraft {
            brand_id,
            market_position_score: market.score,
            customer_match_score: customer.score,
            brand_clarity_score: brand_fit.score,
            overall_health_score: overall_health_score(
                market.score,
                customer.score,
                brand_fit.score,
            ),
            market_position_data: market.data,
            customer_truth_data: customer.data,
            brand_fit_data: brand_fit.data,
            critical_gaps,
            uvp_delivery_analysis: None,
            has_completed_uvp,
            has_buyer_journey,
            analyzed_at: Utc::now(),
        };

        let stored = self.diagnostics.upsert(&draft).await.map_err(|source| {
            tracing::error!(brand_id, error = %source, "failed to persist diagnostic");
            DiagnosticError::Persistence { brand_id, source }
        })?;

        tracing::info!(
            brand_id,
            diagnostic_id = stored.id,
            overall = stored.overall_health_score,
            gaps = stored.critical_gaps.len(),
            "mirror diagnostic stored"
        );
        Ok(stored)
    }
}

/// Run one analyzer under `timeout`, substituting `fallback` on any failure.
async fn settle<T: Send>(
    analyzer: &dyn SubAnalyzer<Data = T>,
    brand_id: i64,
    brand: &BrandData,
    timeout: Duration,
    fallback: fn() -> SubAnalysisResult<T>,
) -> SubAnalysisResult<T> {
    let name = analyzer.name();
    let outcome = tokio::time::timeout(timeout, analyzer.analyze(brand_id, brand))
        .await
        .unwrap_or_else(|_elapsed| {
            Err(AnalyzerError::Timeout {
                analyzer: name,
                timeout_secs: timeout.as_secs(),
            })
        });

    match outcome {
        Ok(result) => {
            if result.score > 100 {
                tracing::warn!(
                    brand_id,
                    analyzer = name,
                    score = result.score,
                    "analyzer score above 100; clamping"
                );
            }
            let result = result.clamped();
            tracing::info!(
                brand_id,
                analyzer = name,
                score = result.score,
                "sub-analysis complete"
            );
            result
        }
        Err(e) => {
            tracing::warn!(
                brand_id,
                analyzer = name,
                error = %e,
                "sub-analysis failed; using fallback"
            );
            fallback()
        }
    }
}

async fn milestone(
    name: &'static str,
    brand_id: i64,
    lookup: impl Future<Output = Result<bool, StoreError>>,
) -> bool {
    match lookup.await {
        Ok(done) => done,
        Err(e) => {
            tracing::warn!(
                brand_id,
                milestone = name,
                error = %e,
                "strategy lookup failed; assuming incomplete"
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
