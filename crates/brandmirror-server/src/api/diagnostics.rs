//! Mirror diagnostic handlers.
//!
//! - `GET  /api/v1/brands/{slug}/diagnostic`          latest diagnostic
//! - `POST /api/v1/brands/{slug}/diagnostic`          run a new diagnostic
//! - `POST /api/v1/brands/{slug}/diagnostic/refresh`  re-run and overwrite
//! - `POST /api/v1/brands/{slug}/diagnostic/uvp`      attach UVP delivery analysis

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use brandmirror_core::MirrorDiagnostic;

use crate::middleware::RequestId;

use super::{map_db_error, map_diagnostic_error, ApiError, ApiResponse, AppState};

type DiagnosticResponse = Result<Json<ApiResponse<MirrorDiagnostic>>, ApiError>;

/// Resolve a brand slug to a `BrandRow`, returning 404 if not found.
async fn resolve_brand(
    pool: &sqlx::PgPool,
    slug: &str,
    request_id: &str,
) -> Result<brandmirror_db::BrandRow, ApiError> {
    brandmirror_db::get_brand_by_slug(pool, slug)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", format!("brand '{slug}' not found")))
}

fn no_diagnostic(request_id: &str, slug: &str) -> ApiError {
    ApiError::new(
        request_id,
        "not_found",
        format!("brand '{slug}' has no diagnostic yet"),
    )
}

pub(super) async fn get_diagnostic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> DiagnosticResponse {
    let brand = resolve_brand(&state.pool, &slug, &req_id.0).await?;

    let diagnostic = state
        .orchestrator
        .load_latest_diagnostic(brand.id)
        .await
        .map_err(|e| map_diagnostic_error(req_id.0.clone(), &e))?
        .ok_or_else(|| no_diagnostic(&req_id.0, &slug))?;

    Ok(Json(ApiResponse::new(diagnostic, req_id.0)))
}

pub(super) async fn run_diagnostic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> DiagnosticResponse {
    let brand = resolve_brand(&state.pool, &slug, &req_id.0).await?;

    let diagnostic = state
        .orchestrator
        .run_full_diagnostic(brand.id, &brand.brand_data())
        .await
        .map_err(|e| map_diagnostic_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(diagnostic, req_id.0)))
}

pub(super) async fn refresh_diagnostic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> DiagnosticResponse {
    let brand = resolve_brand(&state.pool, &slug, &req_id.0).await?;

    let diagnostic = state
        .orchestrator
        .refresh_diagnostic(brand.id, &brand.brand_data())
        .await
        .map_err(|e| map_diagnostic_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(diagnostic, req_id.0)))
}

pub(super) async fn enhance_with_uvp(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> DiagnosticResponse {
    let brand = resolve_brand(&state.pool, &slug, &req_id.0).await?;

    let diagnostic = state
        .orchestrator
        .enhance_with_uvp(brand.id)
        .await
        .map_err(|e| map_diagnostic_error(req_id.0.clone(), &e))?
        .ok_or_else(|| no_diagnostic(&req_id.0, &slug))?;

    Ok(Json(ApiResponse::new(diagnostic, req_id.0)))
}
