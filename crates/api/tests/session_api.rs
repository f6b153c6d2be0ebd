//! HTTP-level integration tests for the `/sessions` endpoints: grants on
//! create, reconciliation on edit, reversal on delete.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

async fn skill_json(pool: &PgPool, token: &str, skill_id: i64) -> serde_json::Value {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{skill_id}"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Grant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_log_session_grants_xp_with_notice(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    let json = common::log_session(&pool, &token, skill_id, 250).await;

    assert_eq!(json["xp_change"]["old_level"], 1);
    assert_eq!(json["xp_change"]["new_level"], 2);
    assert_eq!(json["xp_change"]["level_up"], true);
    assert_eq!(json["xp_change"]["total_xp"], 250);
    assert_eq!(json["notice"], "Congratulations! Guitar reached level 2!");
    assert_eq!(json["session"]["skill_name"], "Guitar");
    assert_eq!(json["session"]["duration_display"], "45m");
    assert_eq!(json["session"]["has_notes"], false);

    let skill = skill_json(&pool, &token, skill_id).await;
    assert_eq!(skill["total_xp"], 250);
    assert_eq!(skill["current_level"], 2);
    assert_eq!(skill["xp_in_current_level"], 150);
    assert_eq!(skill["xp_to_next_level"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_small_grant_has_no_notice(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    let json = common::log_session(&pool, &token, skill_id, 30).await;

    assert_eq!(json["xp_change"]["level_up"], false);
    assert!(json["notice"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_xp_defaults_to_zero(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/sessions",
        serde_json::json!({
            "skill_id": skill_id,
            "date": "2026-03-02",
            "duration_minutes": 90,
            "notes": "scales",
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["session"]["xp_gained"], 0);
    assert_eq!(json["session"]["duration_display"], "1h 30m");
    assert_eq!(json["session"]["duration_hours"], 1.5);
    assert_eq!(json["session"]["has_notes"], true);
    assert_eq!(json["xp_change"]["total_xp"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_xp_returns_400(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/sessions",
        serde_json::json!({
            "skill_id": skill_id,
            "date": "2026-03-02",
            "duration_minutes": 30,
            "xp_gained": -10,
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(skill_json(&pool, &token, skill_id).await["total_xp"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_xp_returns_400(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    for xp_gained in [1_000_001_i64, 9_000_000_000_000_000_000] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/sessions",
            serde_json::json!({
                "skill_id": skill_id,
                "date": "2026-03-02",
                "duration_minutes": 30,
                "xp_gained": xp_gained,
            }),
            &token,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "xp_gained = {xp_gained}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let json = skill_json(&pool, &token, skill_id).await;
    assert_eq!(json["total_xp"], 0);
    assert_eq!(json["current_level"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_to_oversized_xp_returns_400(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    let created = common::log_session(&pool, &token, skill_id, 90).await;
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{session_id}"),
        serde_json::json!({ "xp_gained": i64::MAX }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(skill_json(&pool, &token, skill_id).await["total_xp"], 90);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_duration_returns_400(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/sessions",
        serde_json::json!({
            "skill_id": skill_id,
            "date": "2026-03-02",
            "duration_minutes": 0,
            "xp_gained": 10,
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_log_session_on_foreign_skill_returns_404(pool: PgPool) {
    let alice = common::register(&pool, "alice").await;
    let bob = common::register(&pool, "bob").await;
    let skill_id = common::create_skill(&pool, &bob, "Running").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/sessions",
        serde_json::json!({
            "skill_id": skill_id,
            "date": "2026-03-02",
            "duration_minutes": 30,
            "xp_gained": 500,
        }),
        &alice,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(skill_json(&pool, &bob, skill_id).await["total_xp"], 0);
}

// ---------------------------------------------------------------------------
// Reversal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_session_reverses_xp(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    common::log_session(&pool, &token, skill_id, 420).await;
    let created = common::log_session(&pool, &token, skill_id, 30).await;
    let session_id = created["session"]["id"].as_i64().unwrap();
    assert_eq!(created["xp_change"]["total_xp"], 450);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{session_id}"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], session_id);
    assert_eq!(json["xp_change"]["total_xp"], 420);
    assert_eq!(json["xp_change"]["new_level"], 3);
    assert_eq!(json["xp_change"]["level_up"], false);

    let skill = skill_json(&pool, &token, skill_id).await;
    assert_eq!(skill["total_xp"], 420);
    assert_eq!(skill["sessions"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_session_twice_returns_404(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    let created = common::log_session(&pool, &token, skill_id, 150).await;
    let uri = format!("/api/v1/sessions/{}", created["session"]["id"]);

    let first = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let skill = skill_json(&pool, &token, skill_id).await;
    assert_eq!(skill["total_xp"], 0);
    assert_eq!(skill["current_level"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_foreign_session_returns_404(pool: PgPool) {
    let alice = common::register(&pool, "alice").await;
    let bob = common::register(&pool, "bob").await;
    let skill_id = common::create_skill(&pool, &bob, "Running").await;
    let created = common::log_session(&pool, &bob, skill_id, 120).await;
    let uri = format!("/api/v1/sessions/{}", created["session"]["id"]);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &alice).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(skill_json(&pool, &bob, skill_id).await["total_xp"], 120);
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_session_reconciles_xp(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    let created = common::log_session(&pool, &token, skill_id, 90).await;
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{session_id}"),
        serde_json::json!({ "xp_gained": 320 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["session"]["xp_gained"], 320);
    assert_eq!(json["xp_change"]["total_xp"], 320);
    assert_eq!(json["xp_change"]["new_level"], 3);
    assert_eq!(json["xp_change"]["level_up"], true);

    assert_eq!(skill_json(&pool, &token, skill_id).await["total_xp"], 320);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_notes_leaves_xp_untouched(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    let created = common::log_session(&pool, &token, skill_id, 90).await;
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{session_id}"),
        serde_json::json!({ "notes": "worked on barre chords" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["session"]["notes"], "worked on barre chords");
    assert!(json["xp_change"].is_null());

    assert_eq!(skill_json(&pool, &token, skill_id).await["total_xp"], 90);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_foreign_session_returns_404(pool: PgPool) {
    let alice = common::register(&pool, "alice").await;
    let bob = common::register(&pool, "bob").await;
    let skill_id = common::create_skill(&pool, &bob, "Running").await;
    let created = common::log_session(&pool, &bob, skill_id, 50).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{}", created["session"]["id"]),
        serde_json::json!({ "xp_gained": 5000 }),
        &alice,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(skill_json(&pool, &bob, skill_id).await["total_xp"], 50);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_sessions_with_limit(pool: PgPool) {
    let token = common::register(&pool, "alice").await;
    let skill_id = common::create_skill(&pool, &token, "Guitar").await;
    for xp in [10, 20, 30] {
        common::log_session(&pool, &token, skill_id, xp).await;
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/sessions?limit=2",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get_auth(common::build_test_app(pool), "/api/v1/sessions", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_sessions_zero_limit_returns_400(pool: PgPool) {
    let token = common::register(&pool, "alice").await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/sessions?limit=0",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_sessions_rejects_zero_days(pool: PgPool) {
    let token = common::register(&pool, "alice").await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/sessions/recent?days=0",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_foreign_session_returns_404(pool: PgPool) {
    let alice = common::register(&pool, "alice").await;
    let bob = common::register(&pool, "bob").await;
    let skill_id = common::create_skill(&pool, &bob, "Running").await;
    let created = common::log_session(&pool, &bob, skill_id, 10).await;

    let foreign_id = created["session"]["id"].as_i64().unwrap();
    let missing_id = foreign_id + 10_000;

    // A foreign session must be indistinguishable from a missing one.
    for id in [foreign_id, missing_id] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/sessions/{id}"),
            &alice,
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["error"], format!("PracticeSession with id {id} not found"));
    }
}
