//! `POST /api/v1/health-score`: on-demand blended brand health score.
//!
//! Nothing is persisted; the caller supplies the analysis and, optionally,
//! earlier snapshots to compute a trend against.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use brandmirror_scoring::{
    calculate_brand_health_score, BrandHealthScore, CompleteBrandAnalysis, HealthScoreSnapshot,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse};

#[derive(Debug, Deserialize)]
pub(super) struct HealthScoreRequest {
    pub analysis: CompleteBrandAnalysis,
    #[serde(default)]
    pub history: Option<Vec<HealthScoreSnapshot>>,
}

pub(super) async fn calculate_health_score(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<HealthScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BrandHealthScore>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            rejection.body_text(),
        )
    })?;

    let score = calculate_brand_health_score(&request.analysis, request.history.as_deref());
    tracing::debug!(total = score.total, status = %score.status, "health score calculated");

    Ok(Json(ApiResponse::new(score, req_id.0)))
}
