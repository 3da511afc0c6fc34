//! Integration tests for the verification API.

use admission_store::{NumberPlan, RosterStore, Store, WhitelistRegistry};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use verification_api::api::{
    create_router_with_rate_limit, AppState, GroupLinks, RateLimitState,
};

/// Create a test app state with memory-only storage and one admitted
/// applicant on the roster.
async fn create_test_state() -> AppState {
    let roster = RosterStore::open(Store::memory()).await.unwrap();
    roster
        .upsert("20412345", "Ama Mensah", "BSc Computer Engineering", "fresher")
        .await
        .unwrap();

    let whitelist = WhitelistRegistry::open(Store::memory(), NumberPlan::default())
        .await
        .unwrap();

    let links = GroupLinks {
        official: "https://chat.whatsapp.com/official".to_string(),
        unofficial: "https://chat.whatsapp.com/unofficial".to_string(),
    };

    AppState::new(roster, whitelist, links)
}

fn register_request(applicant_id: &str, phone: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/v1/registrations/{applicant_id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(r#"{{"phone_number":"{phone}"}}"#)))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["roster_count"], 1);
    assert_eq!(json["whitelist_count"], 0);
}

#[tokio::test]
async fn test_roster_lookup_found() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/roster/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["applicant_id"], "20412345");
    assert_eq!(json["full_name"], "Ama Mensah");
    assert_eq!(json["programme"], "BSc Computer Engineering");
}

#[tokio::test]
async fn test_roster_lookup_tolerates_spacing() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    // IDs are often copied from admission letters with stray dashes
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/roster/2041-2345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_roster_lookup_not_found() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/roster/99999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_IN_ADMISSION_LIST");
}

#[tokio::test]
async fn test_register_happy_path() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(register_request("20412345", "0551234567"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "registered");
    assert_eq!(json["phone_number"], "233551234567");
    assert_eq!(json["groups"]["official"], "https://chat.whatsapp.com/official");
    assert_eq!(
        json["groups"]["unofficial"],
        "https://chat.whatsapp.com/unofficial"
    );
}

#[tokio::test]
async fn test_register_unknown_applicant() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(register_request("99999999", "0551234567"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_invalid_phone() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .oneshot(register_request("20412345", "12345"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PHONE_NUMBER");
}

#[tokio::test]
async fn test_register_repeat_is_idempotent() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .clone()
        .oneshot(register_request("20412345", "0551234567"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same applicant coming back, even with a different number
    let response = app
        .oneshot(register_request("20412345", "0209876543"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "already_registered");
    assert!(json["phone_number"].is_null());
    assert_eq!(json["groups"]["official"], "https://chat.whatsapp.com/official");
}

#[tokio::test]
async fn test_register_conflicting_number() {
    let state = create_test_state().await;
    state
        .roster
        .upsert("20467890", "Kofi Boateng", "BSc Electrical Engineering", "fresher")
        .await
        .unwrap();
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .clone()
        .oneshot(register_request("20412345", "0551234567"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Another applicant submitting the same number is rejected
    let response = app
        .oneshot(register_request("20467890", "+233551234567"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PHONE_NUMBER_IN_USE");
}

#[tokio::test]
async fn test_registration_status_roundtrip() {
    let state = create_test_state().await;
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/registrations/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["registered"], false);
    assert!(json.get("groups").is_none());

    let response = app
        .clone()
        .oneshot(register_request("20412345", "0551234567"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/registrations/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["registered"], true);
    assert!(json["registered_at"].is_string());
    assert_eq!(json["groups"]["official"], "https://chat.whatsapp.com/official");
}

#[tokio::test]
async fn test_rate_limiting() {
    let state = create_test_state().await;
    // Very restrictive global limit: 1 request per minute
    let rate_limit = RateLimitState::new(1, 1000);
    let app = create_router_with_rate_limit(state, rate_limit);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_per_applicant_rate_limit_spares_other_applicants() {
    let state = create_test_state().await;
    state
        .roster
        .upsert("20467890", "Kofi Boateng", "BSc Electrical Engineering", "fresher")
        .await
        .unwrap();
    // Generous global quota, one request per applicant per minute
    let rate_limit = RateLimitState::new(1000, 1);
    let app = create_router_with_rate_limit(state, rate_limit);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/roster/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Same applicant hammering the endpoint is throttled
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/roster/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different applicant is unaffected
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/roster/20467890")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_applicant_ingested_after_startup_is_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");

    let roster = RosterStore::open(Store::file(&path)).await.unwrap();
    let whitelist = WhitelistRegistry::open(Store::memory(), NumberPlan::default())
        .await
        .unwrap();
    let links = GroupLinks {
        official: "https://chat.whatsapp.com/official".to_string(),
        unofficial: "https://chat.whatsapp.com/unofficial".to_string(),
    };
    let app = create_router_with_rate_limit(
        AppState::new(roster, whitelist, links),
        RateLimitState::permissive(),
    );

    // The ingestion batch writes to the shared roster file from its own
    // process after the API has already started
    let ingest_side = RosterStore::open(Store::file(&path)).await.unwrap();
    ingest_side
        .upsert("20412345", "Ama Mensah", "BSc Computer Engineering", "fresher")
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/roster/20412345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["full_name"], "Ama Mensah");
}
