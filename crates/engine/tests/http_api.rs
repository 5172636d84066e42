//! HTTP boundary tests: routes, envelopes, and error shapes.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use questboard_domain::{Challenge, ChallengeType, Product, User};

use questboard_engine::api::http::routes;
use questboard_engine::api::ConnectionManager;
use questboard_engine::app::App;
use questboard_engine::infrastructure::auth::UserStoreAuth;
use questboard_engine::infrastructure::clock::SystemClock;
use questboard_engine::infrastructure::persistence::{ensure_schema, SqliteRepositories};
use questboard_engine::infrastructure::ports::{
    ChallengeRepo, ClockPort, ProductRepo, UserRepo,
};

async fn test_app() -> (Router, Arc<App>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    ensure_schema(&pool).await.expect("create schema");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let repos = SqliteRepositories::new(pool, clock);
    let auth = Arc::new(UserStoreAuth::new(repos.users.clone()));
    let connections = Arc::new(ConnectionManager::new());

    let app = Arc::new(App::new(repos, connections, auth));
    (routes().with_state(app.clone()), app)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn test_create_challenge_returns_created_envelope() {
    let (router, _app) = test_app().await;

    let response = router
        .oneshot(post_json(
            "/api/v1/gamify/create-challenge",
            json!({
                "type": "Like",
                "target": 20,
                "points": 10,
                "description": "like 20 products"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["msg"], "successfully created a challenge");
    assert_eq!(body["data"]["type"], "Like");
    assert_eq!(body["data"]["target"], 20);
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn test_invalid_challenge_type_is_bad_request_envelope() {
    let (router, _app) = test_app().await;

    let response = router
        .oneshot(post_json(
            "/api/v1/gamify/create-challenge",
            json!({
                "type": "Follow",
                "target": 20,
                "points": 10,
                "description": "follow someone"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_progress_without_bearer_is_unauthorized() {
    let (router, _app) = test_app().await;

    let uri = format!(
        "/api/v1/gamify/challenges/{}/products/{}/progress",
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4()
    );
    let response = router
        .oneshot(post_json(&uri, json!({})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "unauthorized user");
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn test_progress_happy_path_returns_completed_record() {
    let (router, app) = test_app().await;

    let user = User::new("Ada Lovelace", "ada@example.com");
    app.repositories.users.save(&user).await.expect("seed user");
    let challenge = Challenge::new(ChallengeType::Like, 1, 10, "like a product");
    app.repositories
        .challenges
        .save(&challenge)
        .await
        .expect("seed challenge");
    let product = Product::new("Product A");
    app.repositories
        .products
        .save(&product)
        .await
        .expect("seed product");

    let uri = format!(
        "/api/v1/gamify/challenges/{}/products/{}/progress",
        challenge.id(),
        product.id()
    );
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", user.id))
        .body(Body::from("{}"))
        .expect("request");

    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["msg"], "successfully created a user challenge");
    assert_eq!(body["data"]["progress"], 1);
    assert_eq!(body["data"]["status"], "Completed");
    assert_eq!(body["data"]["points"], 10);
}

#[tokio::test]
async fn test_progress_for_unknown_challenge_is_not_found_envelope() {
    let (router, app) = test_app().await;

    let user = User::new("Ada Lovelace", "ada@example.com");
    app.repositories.users.save(&user).await.expect("seed user");
    let product = Product::new("Product A");
    app.repositories
        .products
        .save(&product)
        .await
        .expect("seed product");

    let uri = format!(
        "/api/v1/gamify/challenges/{}/products/{}/progress",
        uuid::Uuid::new_v4(),
        product.id()
    );
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", user.id))
        .body(Body::from("{}"))
        .expect("request");

    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "This challenge does not exist");
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn test_challenges_list_returns_paginated_envelope() {
    let (router, app) = test_app().await;

    for description in ["like 20 products", "comment on three"] {
        let challenge = Challenge::new(ChallengeType::Like, 5, 5, description);
        app.repositories
            .challenges
            .save(&challenge)
            .await
            .expect("seed challenge");
    }

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/gamify/challenges?page=1&limit=1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalDocs"], 2);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["docs"].as_array().expect("docs").len(), 1);
}
