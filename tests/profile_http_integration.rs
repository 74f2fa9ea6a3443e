//! Integration tests for the profile HTTP endpoints.
//!
//! These tests drive the full router (auth middleware, handlers, error
//! mapping) over the in-memory store:
//! 1. Aggregated view honours sharing flags, limits and windows
//! 2. Unknown usernames and selectors map to the expected statuses
//! 3. Policy updates are owner-only and partial

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use holistic_profile::adapters::auth::MockSessionValidator;
use holistic_profile::adapters::storage::{DataSource, InMemoryProfileStore, StoredMessage, UserData};
use holistic_profile::app::{build_app, AppPorts};
use holistic_profile::config::ServerConfig;
use holistic_profile::domain::foundation::{Timestamp, Username};
use holistic_profile::domain::holistic::records::{BodyRecord, ConnectionRecord, InterestRecord};
use holistic_profile::domain::holistic::{
    Category, HolisticProfile, PhysicalKind, SharingPolicy, MISSING_INFORMATION, NOT_SHARED,
    UNAVAILABLE,
};
use holistic_profile::ports::HolisticProfileRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn user(name: &str) -> Username {
    Username::new(name).unwrap()
}

fn day(d: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, d, 9, 30, 0).unwrap())
}

fn interest(value: &str, d: u32) -> InterestRecord {
    InterestRecord {
        value: value.to_string(),
        confidence: Some(0.8),
        timestamp: day(d),
    }
}

/// alice shares everything except behavior and has three interests.
async fn seeded_store() -> InMemoryProfileStore {
    let store = InMemoryProfileStore::new();
    let policy = SharingPolicy::public().with(Category::Behavior, false);
    store
        .insert_profile(
            HolisticProfile::new(user("alice"))
                .with_policy(policy)
                .with_demographics(json!({"gender": "female", "age": 31}).as_object().cloned().unwrap())
                .with_personalities(vec![json!({"openness": 0.7})]),
        )
        .await;
    store
        .insert_data(
            user("alice"),
            UserData {
                messages: vec![
                    StoredMessage::new(day(1), "morning run").with_affect(0.6, "joy"),
                    StoredMessage::new(day(15), "late train").with_affect(-0.4, "anger"),
                ],
                interests: vec![interest("rust", 1), interest("climbing", 10), interest("jazz", 20)],
                body: vec![BodyRecord {
                    timestamp: day(2),
                    body_fat: Some(21.5),
                    body_weight: Some(61.0),
                    body_bmi: Some(21.1),
                    name_body: None,
                }],
                connections: vec![ConnectionRecord {
                    contact_id: "c-42".to_string(),
                    source: Some("twitter".to_string()),
                }],
                ..Default::default()
            },
        )
        .await;
    store
        .insert_profile(HolisticProfile::new(user("bob")))
        .await;
    store
}

fn app(store: &InMemoryProfileStore) -> Router {
    let sessions = MockSessionValidator::new()
        .with_test_user("alice-token", "alice")
        .with_test_user("bob-token", "bob");
    let ports = AppPorts {
        profiles: Arc::new(store.clone()),
        personal_data: Arc::new(store.clone()),
        sessions: Arc::new(sessions),
    };
    build_app(ports, &ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_raw(uri: &str, token: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// =============================================================================
// GET /api/profile/:username
// =============================================================================

#[tokio::test]
async fn alice_with_limit_two_gets_two_interests_and_hidden_behavior() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profile/alice?c=all&l=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "alice");
    assert_eq!(body["interest"].as_array().unwrap().len(), 2);
    assert_eq!(body["interest"][0]["value"], "rust");
    assert_eq!(body["behavior"], NOT_SHARED);
}

#[tokio::test]
async fn every_category_key_is_present() {
    let store = seeded_store().await;

    let (_, body) = send(app(&store), get("/api/profile/alice")).await;

    for category in Category::ALL {
        assert!(
            body.get(category.response_key()).is_some(),
            "missing key {}",
            category.response_key()
        );
    }
    assert_eq!(body["demographics"]["gender"], "female");
    assert_eq!(body["cognitiveAspects"]["empathies"], MISSING_INFORMATION);
    assert_eq!(body["physicalState"]["heart"], MISSING_INFORMATION);
    assert_eq!(body["physicalState"]["body"][0]["bodyFat"], 21.5);
    assert_eq!(body["socialRelations"][0]["contactId"], "c-42");
}

#[tokio::test]
async fn ghost_is_not_found_without_profile_body() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profile/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"auth": true, "message": "Username not found."}));
}

#[tokio::test]
async fn unknown_category_is_bad_request() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profile/alice?c=Horoscope")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CATEGORY");
}

#[tokio::test]
async fn blank_category_selector_means_all() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profile/alice?c=&l=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interest"].as_array().unwrap().len(), 2);
    assert_eq!(body["affects"].as_array().unwrap().len(), 2);
    assert_eq!(body["behavior"], NOT_SHARED);
}

#[tokio::test]
async fn stale_token_does_not_block_public_reads() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        get_with_token("/api/profile/alice?c=Interest", "expired-token"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interest"].as_array().unwrap().len(), 3);

    let (status, _) = send(
        app(&store),
        get_with_token("/api/profiles?username=al", "expired-token"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(&store), get_with_token("/health", "expired-token")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn single_category_selector_leaves_others_not_shared() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profile/alice?c=Affects")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affects"].as_array().unwrap().len(), 2);
    assert_eq!(body["interest"], NOT_SHARED);
    assert_eq!(body["physicalState"]["body"], NOT_SHARED);
}

#[tokio::test]
async fn window_filters_dated_records_inclusively() {
    let store = seeded_store().await;

    let (_, body) = send(
        app(&store),
        get("/api/profile/alice?c=Interest&fromDate=2024-03-10&toDate=2024-03-20"),
    )
    .await;

    let values: Vec<&str> = body["interest"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["climbing", "jazz"]);
}

#[tokio::test]
async fn malformed_filters_are_ignored() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        get("/api/profile/alice?c=Interest&l=abc&fromDate=yesterday"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interest"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn inverted_window_is_dropped() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        get("/api/profile/alice?c=Interest&fromDate=2024-03-20&toDate=2024-03-01"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interest"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn failing_source_degrades_only_its_category() {
    let store = seeded_store().await;
    store.take_offline(DataSource::Interests).await;
    store
        .take_offline(DataSource::Physical(PhysicalKind::Body))
        .await;

    let (status, body) = send(app(&store), get("/api/profile/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interest"], UNAVAILABLE);
    assert_eq!(body["physicalState"]["body"], UNAVAILABLE);
    assert_eq!(body["affects"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn private_profile_shares_nothing() {
    let store = seeded_store().await;

    let (_, body) = send(app(&store), get("/api/profile/bob")).await;

    assert_eq!(body["demographics"], NOT_SHARED);
    assert_eq!(body["cognitiveAspects"]["personalities"], NOT_SHARED);
    assert_eq!(body["physicalState"]["sleep"], NOT_SHARED);
    assert_eq!(body["socialRelations"], NOT_SHARED);
}

// =============================================================================
// POST /api/user/config
// =============================================================================

#[tokio::test]
async fn bob_cannot_change_alices_policy() {
    let store = seeded_store().await;
    let before = store.find_by_username(&user("alice")).await.unwrap().unwrap();

    let (status, body) = send(
        app(&store),
        post_json(
            "/api/user/config?shareBehavior=true",
            Some("bob-token"),
            json!({"username": "alice"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"auth": false, "message": "You do not have the required permissions."})
    );
    let after = store.find_by_username(&user("alice")).await.unwrap().unwrap();
    assert_eq!(after.policy(), before.policy());
    assert_eq!(after.version(), before.version());
}

#[tokio::test]
async fn owner_update_changes_only_supplied_flags() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_json(
            "/api/user/config?shareInterest=true&shareAffects=false",
            Some("bob-token"),
            json!({"username": "bob"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"auth": true}));
    let bob = store.find_by_username(&user("bob")).await.unwrap().unwrap();
    assert!(bob.policy().is_shared(Category::Interest));
    assert!(!bob.policy().is_shared(Category::Affects));
    assert!(!bob.policy().is_shared(Category::Demographics));
    assert_eq!(bob.version().as_u32(), 2);
}

#[tokio::test]
async fn policy_update_without_token_is_unauthorized() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_json("/api/user/config?shareInterest=true", None, json!({"username": "bob"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["auth"], false);
}

#[tokio::test]
async fn policy_update_with_bad_token_is_unauthorized() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_json(
            "/api/user/config?shareInterest=true",
            Some("expired-token"),
            json!({"username": "bob"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"auth": false, "message": "Failed to authenticate token."})
    );
}

#[tokio::test]
async fn policy_update_without_json_body_is_permission_denied() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_raw("/api/user/config?shareInterest=true", "bob-token", ""),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"auth": false, "message": "You do not have the required permissions."})
    );
    let bob = store.find_by_username(&user("bob")).await.unwrap().unwrap();
    assert!(!bob.policy().is_shared(Category::Interest));
}

#[tokio::test]
async fn update_without_flags_keeps_policy_version() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_json("/api/user/config", Some("bob-token"), json!({"username": "bob"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"auth": true}));
    let bob = store.find_by_username(&user("bob")).await.unwrap().unwrap();
    assert_eq!(bob.version().as_u32(), 1);
}

#[tokio::test]
async fn policy_update_for_missing_profile_is_not_found() {
    let store = seeded_store().await;
    let sessions = MockSessionValidator::new().with_test_user("ghost-token", "ghost");
    let app = build_app(
        AppPorts {
            profiles: Arc::new(store.clone()),
            personal_data: Arc::new(store.clone()),
            sessions: Arc::new(sessions),
        },
        &ServerConfig::default(),
    );

    let (status, _) = send(
        app,
        post_json("/api/user/config", Some("ghost-token"), json!({"username": "ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// POST /api/user, GET /api/profiles, GET /health
// =============================================================================

#[tokio::test]
async fn owner_reads_own_record_with_config() {
    let store = seeded_store().await;

    let (status, body) = send(
        app(&store),
        post_json("/api/user", Some("alice-token"), json!({"username": "alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["holisticProfileConfig"]["shareBehavior"], false);
    assert_eq!(body["holisticProfileConfig"]["shareInterest"], true);
}

#[tokio::test]
async fn reading_someone_elses_record_is_unauthorized() {
    let store = seeded_store().await;

    let (status, _) = send(
        app(&store),
        post_json("/api/user", Some("bob-token"), json!({"username": "alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn own_record_with_malformed_body_is_permission_denied() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), post_raw("/api/user", "alice-token", "alice")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["auth"], false);
    assert_eq!(body["message"], "You do not have the required permissions.");
}

#[tokio::test]
async fn search_returns_matching_usernames() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/api/profiles?username=AL")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["alice"]));
}

#[tokio::test]
async fn health_reports_ok() {
    let store = seeded_store().await;

    let (status, body) = send(app(&store), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
