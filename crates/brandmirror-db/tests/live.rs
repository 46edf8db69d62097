//! Live integration tests for brandmirror-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. `"../../migrations"` is relative to the crate root.

use brandmirror_core::{
    BrandData, BrandFitData, CriticalGap, CustomerTruthData, MarketPositionData,
    MirrorDiagnosticDraft, UvpDeliveryAnalysis,
};
use brandmirror_db::{
    complete_buyer_journey, get_brand_by_id, get_brand_by_slug, get_completed_value_proposition,
    get_diagnostic_by_brand, has_buyer_journey, has_completed_uvp, list_active_brands,
    list_brand_ids_with_diagnostics, update_uvp_delivery_analysis, upsert_brand, upsert_diagnostic,
    upsert_value_proposition, DbError, NewMirrorDiagnostic,
};
use chrono::Utc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn brand(name: &str) -> BrandData {
    BrandData {
        name: name.to_string(),
        industry: Some("Specialty coffee".to_string()),
        location: Some("Portland, OR".to_string()),
        target_audience: Some("Home brewers".to_string()),
    }
}

async fn insert_test_brand(pool: &sqlx::PgPool, slug: &str) -> i64 {
    upsert_brand(pool, slug, &brand(&format!("Test Brand {slug}")))
        .await
        .unwrap_or_else(|e| panic!("upsert_brand failed for slug '{slug}': {e}"))
        .id
}

fn draft(brand_id: i64, market_score: u8, gaps: usize) -> MirrorDiagnosticDraft {
    let critical_gaps = (1..=gaps)
        .map(|p| CriticalGap {
            priority: u8::try_from(p).unwrap(),
            gap: format!("Gap {p}"),
            impact: "impact".to_string(),
            fix: "fix".to_string(),
            fix_action_link: "/strategy/uvp".to_string(),
        })
        .collect();

    MirrorDiagnosticDraft {
        brand_id,
        market_position_score: market_score,
        customer_match_score: 50,
        brand_clarity_score: 50,
        overall_health_score: brandmirror_core::overall_health_score(market_score, 50, 50),
        market_position_data: MarketPositionData::fallback(),
        customer_truth_data: CustomerTruthData::fallback(),
        brand_fit_data: BrandFitData::fallback(),
        critical_gaps,
        uvp_delivery_analysis: None,
        has_completed_uvp: false,
        has_buyer_journey: false,
        analyzed_at: Utc::now(),
    }
}

async fn upsert(pool: &sqlx::PgPool, draft: &MirrorDiagnosticDraft) -> Result<i64, DbError> {
    let new = NewMirrorDiagnostic::from_draft(draft)?;
    Ok(upsert_diagnostic(pool, &new).await?.id)
}

// ---------------------------------------------------------------------------
// Brands
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn brand_upsert_is_keyed_by_slug(pool: sqlx::PgPool) {
    let first = upsert_brand(&pool, "blue-harbor", &brand("Blue Harbor"))
        .await
        .expect("first upsert");
    let second = upsert_brand(&pool, "blue-harbor", &brand("Blue Harbor Coffee Co"))
        .await
        .expect("second upsert");

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Blue Harbor Coffee Co");

    let fetched = get_brand_by_slug(&pool, "blue-harbor")
        .await
        .expect("get_brand_by_slug")
        .expect("brand exists");
    assert_eq!(fetched.id, first.id);

    let by_id = get_brand_by_id(&pool, first.id)
        .await
        .expect("get_brand_by_id")
        .expect("brand exists");
    assert_eq!(by_id.slug, "blue-harbor");
}

#[sqlx::test(migrations = "../../migrations")]
async fn inactive_brands_are_hidden(pool: sqlx::PgPool) {
    let id = insert_test_brand(&pool, "dormant").await;
    insert_test_brand(&pool, "awake").await;
    sqlx::query("UPDATE brands SET is_active = false WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .expect("deactivate");

    let active = list_active_brands(&pool).await.expect("list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].slug, "awake");
    assert!(get_brand_by_slug(&pool, "dormant")
        .await
        .expect("query")
        .is_none());
}

// ---------------------------------------------------------------------------
// Strategy milestones
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_counts_only_when_complete(pool: sqlx::PgPool) {
    let id = insert_test_brand(&pool, "uvp-brand").await;
    assert!(!has_completed_uvp(&pool, id).await.expect("lookup"));

    let draft_row = upsert_value_proposition(&pool, id, "Freshest beans in town", false)
        .await
        .expect("draft uvp");
    assert!(draft_row.completed_at.is_none());
    assert!(!has_completed_uvp(&pool, id).await.expect("lookup"));
    assert!(get_completed_value_proposition(&pool, id)
        .await
        .expect("lookup")
        .is_none());

    let done = upsert_value_proposition(&pool, id, "Roasted this week", true)
        .await
        .expect("complete uvp");
    assert!(done.completed_at.is_some());
    assert!(has_completed_uvp(&pool, id).await.expect("lookup"));

    let stored = get_completed_value_proposition(&pool, id)
        .await
        .expect("lookup")
        .expect("completed uvp");
    assert_eq!(stored.statement, "Roasted this week");
}

#[sqlx::test(migrations = "../../migrations")]
async fn buyer_journey_completion_is_idempotent(pool: sqlx::PgPool) {
    let id = insert_test_brand(&pool, "journey-brand").await;
    assert!(!has_buyer_journey(&pool, id).await.expect("lookup"));

    complete_buyer_journey(&pool, id).await.expect("first");
    complete_buyer_journey(&pool, id).await.expect("second");

    assert!(has_buyer_journey(&pool, id).await.expect("lookup"));
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buyer_journeys WHERE brand_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn diagnostic_upsert_keeps_one_row_per_brand(pool: sqlx::PgPool) {
    let brand_id = insert_test_brand(&pool, "diag-brand").await;

    let first_id = upsert(&pool, &draft(brand_id, 40, 1)).await.expect("first run");
    let first = get_diagnostic_by_brand(&pool, brand_id)
        .await
        .expect("load")
        .expect("row");

    let second_id = upsert(&pool, &draft(brand_id, 80, 2)).await.expect("second run");
    assert_eq!(first_id, second_id);

    let stored = get_diagnostic_by_brand(&pool, brand_id)
        .await
        .expect("load")
        .expect("row")
        .into_diagnostic()
        .expect("decode");
    assert_eq!(stored.market_position_score, 80);
    assert_eq!(stored.overall_health_score, 60);
    assert_eq!(stored.critical_gaps.len(), 2);
    assert_eq!(stored.created_at, first.created_at);
    assert!(stored.updated_at >= first.updated_at);

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM mirror_diagnostics WHERE brand_id = $1")
            .bind(brand_id)
            .fetch_one(&pool)
            .await
            .expect("count");
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_upserts_converge_on_one_row(pool: sqlx::PgPool) {
    let brand_id = insert_test_brand(&pool, "racing-brand").await;
    let a = draft(brand_id, 30, 0);
    let b = draft(brand_id, 90, 0);

    let (ra, rb) = tokio::join!(upsert(&pool, &a), upsert(&pool, &b));
    assert_eq!(ra.expect("a"), rb.expect("b"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mirror_diagnostics")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn schema_rejects_more_than_three_gaps(pool: sqlx::PgPool) {
    let brand_id = insert_test_brand(&pool, "gap-heavy").await;
    let err = upsert(&pool, &draft(brand_id, 50, 4))
        .await
        .expect_err("four gaps should violate the check constraint");
    assert!(matches!(err, DbError::Sqlx(_)), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn diagnostic_requires_existing_brand(pool: sqlx::PgPool) {
    let err = upsert(&pool, &draft(999_999, 50, 0))
        .await
        .expect_err("unknown brand should violate the foreign key");
    assert!(matches!(err, DbError::Sqlx(_)), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_delivery_update_leaves_scores_alone(pool: sqlx::PgPool) {
    let brand_id = insert_test_brand(&pool, "uvp-delivery").await;
    upsert(&pool, &draft(brand_id, 72, 1)).await.expect("run");

    let analysis = UvpDeliveryAnalysis {
        uvp_promise: "Roasted this week".to_string(),
        delivery_score: 50,
        alignment: "pending".to_string(),
        customer_confirmations: vec![],
        gaps: vec![],
        analyzed_at: Utc::now(),
    };
    let updated = update_uvp_delivery_analysis(&pool, brand_id, &analysis)
        .await
        .expect("update")
        .into_diagnostic()
        .expect("decode");

    assert!(updated.has_completed_uvp);
    assert_eq!(updated.market_position_score, 72);
    assert_eq!(updated.critical_gaps.len(), 1);
    assert_eq!(
        updated.uvp_delivery_analysis.map(|u| u.uvp_promise).as_deref(),
        Some("Roasted this week")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn uvp_delivery_update_without_diagnostic_is_not_found(pool: sqlx::PgPool) {
    let brand_id = insert_test_brand(&pool, "no-diag").await;
    let analysis = UvpDeliveryAnalysis {
        uvp_promise: "x".to_string(),
        delivery_score: 50,
        alignment: "pending".to_string(),
        customer_confirmations: vec![],
        gaps: vec![],
        analyzed_at: Utc::now(),
    };
    let err = update_uvp_delivery_analysis(&pool, brand_id, &analysis)
        .await
        .expect_err("no row to update");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_targets_are_brands_with_diagnostics(pool: sqlx::PgPool) {
    let with = insert_test_brand(&pool, "has-diag").await;
    insert_test_brand(&pool, "no-diag-yet").await;
    upsert(&pool, &draft(with, 50, 0)).await.expect("run");

    let ids = list_brand_ids_with_diagnostics(&pool).await.expect("list");
    assert_eq!(ids, vec![with]);
}
