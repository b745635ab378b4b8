//! HTTP routes and shared request plumbing

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod health;
pub mod profile;

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medibook_domain::{MedibookError, UserRecord};

use crate::context::AppContext;

/// Build the API router
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/doctors", get(doctors::directory))
        .route("/doctors/pending", get(doctors::pending))
        .route("/doctors/{id}", get(doctors::details))
        .route("/doctors/{id}/decision", post(doctors::decide))
        .route("/appointments", post(appointments::book).get(appointments::list_own))
        .route("/appointments/pending", get(appointments::pending_for_doctor))
        .route("/appointments/{id}/approve", post(appointments::approve))
        .route("/appointments/{id}/reject", post(appointments::reject))
        .route("/profile", get(profile::show).put(profile::update))
        .route("/profile/photo", put(profile::photo))
        .with_state(ctx)
}

/// Error wrapper mapping the domain taxonomy onto HTTP statuses
pub struct ApiError(MedibookError);

impl From<MedibookError> for ApiError {
    fn from(err: MedibookError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MedibookError::NotFound(_) => StatusCode::NOT_FOUND,
            MedibookError::Conflict(_) => StatusCode::CONFLICT,
            MedibookError::Auth(_) => StatusCode::UNAUTHORIZED,
            MedibookError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

/// Result alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Extract the bearer token from the Authorization header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the calling user from the Authorization header
pub(crate) async fn current_user(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<UserRecord, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| MedibookError::Auth("missing bearer token".into()))?;
    Ok(ctx.accounts.authenticate(token).await?)
}

/// Resolve the calling user and check the admin claim
pub(crate) async fn current_admin(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<UserRecord, ApiError> {
    let user = current_user(ctx, headers).await?;
    ctx.accounts.require_admin(&user).await?;
    Ok(user)
}
