//! Doctor directory and admission endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use medibook_domain::{ApprovalDecision, DoctorDetails, DoctorRecord};
use serde::Deserialize;

use super::{current_admin, ApiResult};
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: ApprovalDecision,
    pub note: Option<String>,
}

/// Approved doctors, ordered by name. This is the bookable directory.
pub async fn directory(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<Vec<DoctorRecord>>> {
    Ok(Json(ctx.doctors.directory().await?))
}

/// Admin: doctors awaiting a decision.
pub async fn pending(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<DoctorRecord>>> {
    current_admin(&ctx, &headers).await?;
    Ok(Json(ctx.doctors.pending().await?))
}

/// Admin: candidate detail view with recent decision history.
pub async fn details(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DoctorDetails>> {
    current_admin(&ctx, &headers).await?;
    Ok(Json(ctx.doctors.details(&id).await?))
}

/// Admin: approve or reject a candidate.
pub async fn decide(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<Json<DoctorRecord>> {
    let admin = current_admin(&ctx, &headers).await?;
    let doctor = ctx.doctors.decide(&admin, &id, request.decision, request.note).await?;
    Ok(Json(doctor))
}
