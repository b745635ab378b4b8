//! Profile endpoints

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use medibook_domain::{MedibookError, UserRecord};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{current_user, ApiResult};
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// The caller's profile.
pub async fn show(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<UserRecord>> {
    let user = current_user(&ctx, &headers).await?;
    Ok(Json(user))
}

/// Merge name/phone into the caller's profile.
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserRecord>> {
    let user = current_user(&ctx, &headers).await?;
    let updated = ctx.accounts.update_profile(&user, request.name, request.phone).await?;
    Ok(Json(updated))
}

/// Upload a profile photo. The extension derives from the Content-Type.
pub async fn photo(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let user = current_user(&ctx, &headers).await?;
    let extension = photo_extension(&headers)?;
    let url = ctx.accounts.store_photo(&user, extension, &body).await?;
    Ok(Json(json!({ "photo_url": url })))
}

fn photo_extension(headers: &HeaderMap) -> Result<&'static str, MedibookError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        other => Err(MedibookError::InvalidInput(format!(
            "unsupported photo content type: {other}"
        ))),
    }
}
