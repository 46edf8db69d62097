use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use brandmirror_core::{BrandData, BrandFitData, CustomerTruthData, MarketPositionData};
use brandmirror_diagnostic::{
    Analyzers, HttpSubAnalyzer, PgDiagnosticStore, PgStrategyStore, StoreError,
};
use tower::ServiceExt;

use super::*;

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

/// Orchestrator whose analyzers have no endpoints, so every run falls back.
fn offline_orchestrator(pool: PgPool) -> DiagnosticOrchestrator {
    let analyzers = Analyzers {
        market_position: Arc::new(
            HttpSubAnalyzer::<MarketPositionData>::new("market_position", None, 1, "test")
                .expect("client"),
        ),
        customer_truth: Arc::new(
            HttpSubAnalyzer::<CustomerTruthData>::new("customer_truth", None, 1, "test")
                .expect("client"),
        ),
        brand_fit: Arc::new(
            HttpSubAnalyzer::<BrandFitData>::new("brand_fit", None, 1, "test").expect("client"),
        ),
    };
    DiagnosticOrchestrator::new(
        analyzers,
        Arc::new(PgDiagnosticStore::new(pool.clone())),
        Arc::new(PgStrategyStore::new(pool)),
        Duration::from_secs(1),
    )
}

fn offline_state(pool: PgPool) -> AppState {
    AppState {
        orchestrator: offline_orchestrator(pool.clone()),
        pool,
    }
}

/// State backed by a pool that never connects; for routes that skip the database.
fn detached_state() -> AppState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://brandmirror@127.0.0.1:1/unused")
        .expect("lazy pool");
    offline_state(pool)
}

async fn seed_brand(pool: &PgPool, slug: &str) -> i64 {
    let brand = BrandData {
        name: format!("Brand {slug}"),
        industry: Some("Specialty coffee".to_string()),
        location: None,
        target_audience: None,
    };
    brandmirror_db::upsert_brand(pool, slug, &brand)
        .await
        .expect("seed brand")
        .id
}

async fn send(app: Router, method: &str, uri: &str, body: Body) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn analysis_json() -> serde_json::Value {
    serde_json::json!({
        "messaging": {
            "voice_consistency": 72.0,
            "themes": [{ "name": "Shop now", "call_to_action": true }]
        },
        "audience": { "industry_confidence": 88.0 },
        "metrics": { "engagement": 50.0, "consistency": 61.0, "clarity": 70.0 },
        "identity": { "colors": ["#000000"] },
        "golden_circle": { "why_score": 60.0, "how_score": 70.0, "what_score": 80.0 }
    })
}

// -------------------------------------------------------------------------
// Error mapping
// -------------------------------------------------------------------------

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_internal_error() {
    let response = ApiError::new("req-1", "internal_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn persistence_failure_hides_store_details() {
    let error = DiagnosticError::Persistence {
        brand_id: 7,
        source: StoreError::Backend("password=hunter2".to_string()),
    };
    let api_error = map_diagnostic_error("req-9".to_string(), &error);
    assert_eq!(api_error.error.code, "internal_error");
    assert_eq!(api_error.error.message, "diagnostic could not be saved");
}

// -------------------------------------------------------------------------
// Routes without a database
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_score_blends_posted_analysis() {
    let app = build_app(detached_state(), AuthState::disabled());
    let body = serde_json::json!({ "analysis": analysis_json(), "history": [] });

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/health-score",
        Body::from(body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // MARBA 36.9, Mirror 33.5
    assert_eq!(json["data"]["total"].as_u64(), Some(35));
    assert_eq!(json["data"]["status"].as_str(), Some("needs-work"));
    assert_eq!(
        json["data"]["trend"]["period"].as_str(),
        Some("first calculation")
    );
    assert_eq!(
        json["data"]["category_details"].as_array().map(Vec::len),
        Some(5)
    );
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn health_score_without_history_reports_first_calculation() {
    let app = build_app(detached_state(), AuthState::disabled());
    let body = serde_json::json!({ "analysis": analysis_json() });

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/health-score",
        Body::from(body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["trend"]["previous_score"].as_u64(), Some(35));
    assert_eq!(json["data"]["trend"]["change"].as_i64(), Some(0));
    assert_eq!(
        json["data"]["trend"]["period"].as_str(),
        Some("first calculation")
    );
}

#[tokio::test]
async fn malformed_health_score_body_is_a_validation_error() {
    let app = build_app(detached_state(), AuthState::disabled());

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/health-score",
        Body::from(r#"{"analysis": {"messaging": 5}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let auth = AuthState::from_keys("test-key", false).expect("auth");
    let app = build_app(detached_state(), auth);
    let body = serde_json::json!({ "analysis": analysis_json() }).to_string();

    let (status, json) = send(
        app.clone(),
        "POST",
        "/api/v1/health-score",
        Body::from(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"].as_str(), Some("unauthorized"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/health-score")
                .header("content-type", "application/json")
                .header("authorization", "Bearer test-key")
                .header("x-request-id", "req-from-client")
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-from-client")
    );
}

// -------------------------------------------------------------------------
// Diagnostic routes (with DB)
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_database_ok(pool: sqlx::PgPool) {
    let app = build_app(offline_state(pool), AuthState::disabled());
    let (status, json) = send(app, "GET", "/api/v1/health", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["database"].as_str(), Some("ok"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_brand_is_not_found(pool: sqlx::PgPool) {
    let app = build_app(offline_state(pool), AuthState::disabled());
    let (status, json) = send(
        app,
        "POST",
        "/api/v1/brands/nonexistent-slug/diagnostic",
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn diagnostic_lifecycle_over_http(pool: sqlx::PgPool) {
    seed_brand(&pool, "http-brand").await;
    let app = build_app(offline_state(pool.clone()), AuthState::disabled());

    let (status, _) = send(
        app.clone(),
        "GET",
        "/api/v1/brands/http-brand/diagnostic",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        app.clone(),
        "POST",
        "/api/v1/brands/http-brand/diagnostic",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["overall_health_score"].as_u64(), Some(50));
    let id = json["data"]["id"].as_i64().expect("diagnostic id");

    let (status, json) = send(
        app.clone(),
        "POST",
        "/api/v1/brands/http-brand/diagnostic/refresh",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"].as_i64(), Some(id));

    let (status, json) = send(
        app,
        "GET",
        "/api/v1/brands/http-brand/diagnostic",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"].as_i64(), Some(id));
    assert!(json["data"]["uvp_delivery_analysis"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_enhancement_requires_a_diagnostic(pool: sqlx::PgPool) {
    seed_brand(&pool, "uvp-http").await;
    let app = build_app(offline_state(pool), AuthState::disabled());

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/brands/uvp-http/diagnostic/uvp",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("no diagnostic")));
}

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_enhancement_attaches_delivery_analysis(pool: sqlx::PgPool) {
    let brand_id = seed_brand(&pool, "uvp-ready").await;
    brandmirror_db::upsert_value_proposition(&pool, brand_id, "Roasted this week", true)
        .await
        .expect("uvp");
    let app = build_app(offline_state(pool), AuthState::disabled());

    let (status, json) = send(
        app.clone(),
        "POST",
        "/api/v1/brands/uvp-ready/diagnostic",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["has_completed_uvp"].as_bool(), Some(true));

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/brands/uvp-ready/diagnostic/uvp",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["uvp_delivery_analysis"]["uvp_promise"].as_str(),
        Some("Roasted this week")
    );
    assert_eq!(
        json["data"]["uvp_delivery_analysis"]["alignment"].as_str(),
        Some("pending")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_completed_after_run_is_picked_up_by_enhancement(pool: sqlx::PgPool) {
    let brand_id = seed_brand(&pool, "late-uvp").await;
    let app = build_app(offline_state(pool.clone()), AuthState::disabled());

    let (status, json) = send(
        app.clone(),
        "POST",
        "/api/v1/brands/late-uvp/diagnostic",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["has_completed_uvp"].as_bool(), Some(false));

    brandmirror_db::upsert_value_proposition(&pool, brand_id, "Roasted this week", true)
        .await
        .expect("uvp");

    let (status, json) = send(
        app,
        "POST",
        "/api/v1/brands/late-uvp/diagnostic/uvp",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["has_completed_uvp"].as_bool(), Some(true));
    assert_eq!(
        json["data"]["uvp_delivery_analysis"]["uvp_promise"].as_str(),
        Some("Roasted this week")
    );
}

// -------------------------------------------------------------------------
// Scheduled refresh
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_job_only_touches_brands_with_diagnostics(pool: sqlx::PgPool) {
    let with = seed_brand(&pool, "refresh-me").await;
    seed_brand(&pool, "never-run").await;
    let state = offline_state(pool.clone());
    state
        .orchestrator
        .run_full_diagnostic(with, &BrandData {
            name: "Brand refresh-me".to_string(),
            industry: None,
            location: None,
            target_audience: None,
        })
        .await
        .expect("initial run");

    let summary = crate::scheduler::run_refresh_job(&state).await;

    assert_eq!(summary.refreshed, 1);
    assert_eq!(summary.failed, 0);
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mirror_diagnostics")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}
