//! Appointment endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use medibook_domain::{Appointment, AppointmentView, BookingRequest};
use serde::Deserialize;

use super::{current_user, ApiResult};
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Book an appointment for the calling patient.
pub async fn book(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(request): Json<BookingRequest>,
) -> ApiResult<Json<Appointment>> {
    let user = current_user(&ctx, &headers).await?;
    let appointment = ctx.booking.book(&user.id, request).await?;
    Ok(Json(appointment))
}

/// The caller's appointments, newest first. `?limit=N` yields the compact
/// dashboard view.
pub async fn list_own(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<AppointmentView>>> {
    let user = current_user(&ctx, &headers).await?;
    let views = ctx.booking.appointments_for_patient(&user.id, query.limit).await?;
    Ok(Json(views))
}

/// The calling doctor's review queue.
pub async fn pending_for_doctor(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Appointment>>> {
    let user = current_user(&ctx, &headers).await?;
    Ok(Json(ctx.booking.pending_for_doctor(&user.id).await?))
}

/// Approve an appointment; fails with 409 when the slot is already taken.
pub async fn approve(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    current_user(&ctx, &headers).await?;
    Ok(Json(ctx.booking.approve(&id).await?))
}

/// Reject an appointment with an optional reason.
pub async fn reject(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<RejectRequest>,
) -> ApiResult<StatusCode> {
    current_user(&ctx, &headers).await?;
    ctx.booking.reject(&id, request.reason).await?;
    Ok(StatusCode::NO_CONTENT)
}
