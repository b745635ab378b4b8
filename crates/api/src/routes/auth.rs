//! Registration and session endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use medibook_core::RegisterRequest;
use medibook_domain::{MedibookError, UserRecord, UserRole};
use serde::{Deserialize, Serialize};

use super::{bearer_token, ApiResult};
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: UserRole,
    pub user: UserRecord,
}

/// Create an account. Doctor registrations stay pending until an admin
/// decides them.
pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<UserRecord>> {
    let user = ctx.accounts.register(request).await?;
    Ok(Json(user))
}

/// Sign in; the role in the response drives the client's landing page.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (session, user) = ctx.accounts.sign_in(&request.email, &request.password).await?;
    Ok(Json(LoginResponse { token: session.token, role: user.role, user }))
}

/// Revoke the caller's session.
pub async fn logout(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| MedibookError::Auth("missing bearer token".to_string()))?;
    ctx.accounts.sign_out(token).await?;
    Ok(Json(serde_json::json!({ "status": "signed_out" })))
}
