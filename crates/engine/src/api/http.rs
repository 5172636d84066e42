//! HTTP routes.
//!
//! Every success response is the uniform `{ success, msg, data }` envelope;
//! every failure is rendered by `ApiError` as `{ success: false, message,
//! statusCode }` with the HTTP status mirroring `statusCode`. This is the
//! only place domain errors become client responses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use questboard_domain::{BadgeId, ChallengeId, ProductId};
use questboard_shared::{ApiErrorBody, ApiResponse};

use crate::app::App;
use crate::infrastructure::ports::{AuthError, AuthenticatedUser, RepoError};
use crate::use_cases::achievement::{AchievementError, CreateAchievementInput, CreateBadgeInput};
use crate::use_cases::challenge::{ChallengeError, CreateChallengeInput, ProgressError};
use crate::use_cases::product::ProductError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/v1/gamify/create-challenge", post(create_challenge))
        .route("/api/v1/gamify/challenges", get(get_challenges))
        .route(
            "/api/v1/gamify/challenges/{challenge_id}/products/{product_id}/progress",
            post(record_progress),
        )
        .route("/api/v1/gamify/products", post(create_product))
        .route("/api/v1/gamify/create-badge", post(create_badge))
        .route("/api/v1/gamify/create-achievement", post(create_achievement))
        .route("/api/v1/gamify/user-achievements", get(get_user_achievements))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Challenges
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateChallengeRequest {
    #[serde(rename = "type")]
    challenge_type: String,
    target: u32,
    points: u32,
    description: String,
}

async fn create_challenge(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateChallengeRequest>,
) -> Result<Response, ApiError> {
    let challenge = app
        .use_cases
        .challenge
        .ops
        .create(CreateChallengeInput {
            challenge_type: body.challenge_type,
            target: body.target,
            points: body.points,
            description: body.description,
        })
        .await?;

    Ok(created("successfully created a challenge", challenge))
}

#[derive(Debug, Deserialize)]
struct ListChallengesQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
}

async fn get_challenges(
    State(app): State<Arc<App>>,
    Query(query): Query<ListChallengesQuery>,
) -> Result<Response, ApiError> {
    let challenges = app
        .use_cases
        .challenge
        .ops
        .list(query.page, query.limit, query.search)
        .await?;

    Ok(ok("successfully retrieved all challenges", challenges))
}

#[derive(Debug, Deserialize)]
struct ProgressRequest {
    comment: Option<String>,
}

async fn record_progress(
    identity: AuthenticatedUser,
    State(app): State<Arc<App>>,
    Path((challenge_id, product_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ProgressRequest>,
) -> Result<Response, ApiError> {
    let record = app
        .use_cases
        .challenge
        .record_progress
        .execute(
            identity.user_id,
            ChallengeId::from_uuid(challenge_id),
            ProductId::from_uuid(product_id),
            body.comment,
        )
        .await?;

    Ok(created("successfully created a user challenge", record))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateProductRequest {
    name: String,
}

async fn create_product(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateProductRequest>,
) -> Result<Response, ApiError> {
    let product = app.use_cases.product.create(body.name).await?;
    Ok(created("successfully created a product", product))
}

// =============================================================================
// Badges and achievements
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateBadgeRequest {
    name: String,
    description: String,
    icon: String,
}

async fn create_badge(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateBadgeRequest>,
) -> Result<Response, ApiError> {
    let badge = app
        .use_cases
        .achievement
        .create_badge(CreateBadgeInput {
            name: body.name,
            description: body.description,
            icon: body.icon,
        })
        .await?;
    Ok(created("successfully created a badge", badge))
}

#[derive(Debug, Deserialize)]
struct CreateAchievementRequest {
    name: String,
    points: u32,
    description: String,
    badge: Uuid,
}

async fn create_achievement(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateAchievementRequest>,
) -> Result<Response, ApiError> {
    let achievement = app
        .use_cases
        .achievement
        .create_achievement(CreateAchievementInput {
            name: body.name,
            points: body.points,
            description: body.description,
            badge: BadgeId::from_uuid(body.badge),
        })
        .await?;
    Ok(created("successfully created an achievement", achievement))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

async fn get_user_achievements(
    identity: AuthenticatedUser,
    State(app): State<Arc<App>>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let achievements = app
        .use_cases
        .achievement
        .list_for_user(identity.user_id, query.page, query.limit)
        .await?;
    Ok(ok("successfully retrieved all user achievements", achievements))
}

// =============================================================================
// Envelopes and errors
// =============================================================================

fn created<T: serde::Serialize>(msg: &str, data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::new(msg, data))).into_response()
}

fn ok<T: serde::Serialize>(msg: &str, data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::new(msg, data))).into_response()
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (
            status,
            Json(ApiErrorBody::new(message, status.as_u16())),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized => ApiError::Unauthorized(e.to_string()),
            AuthError::Forbidden => ApiError::Forbidden(e.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ProgressError> for ApiError {
    fn from(e: ProgressError) -> Self {
        match e {
            ProgressError::ChallengeNotFound(_) | ProgressError::ProductNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ProgressError::AlreadyCompleted => ApiError::BadRequest(e.to_string()),
            ProgressError::Repo(repo) => repo.into(),
        }
    }
}

impl From<ChallengeError> for ApiError {
    fn from(e: ChallengeError) -> Self {
        match e {
            ChallengeError::Validation(_) => ApiError::BadRequest(e.to_string()),
            ChallengeError::Repo(repo) => repo.into(),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::Validation(_) => ApiError::BadRequest(e.to_string()),
            ProductError::Repo(repo) => repo.into(),
        }
    }
}

impl From<AchievementError> for ApiError {
    fn from(e: AchievementError) -> Self {
        match e {
            AchievementError::BadgeNotFound(_) => ApiError::NotFound(e.to_string()),
            AchievementError::Validation(_) => ApiError::BadRequest(e.to_string()),
            AchievementError::Repo(repo) => repo.into(),
        }
    }
}
