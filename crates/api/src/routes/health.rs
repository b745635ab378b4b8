//! Health endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::ApiResult;
use crate::context::AppContext;

/// Liveness probe: verifies database connectivity.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<Value>> {
    ctx.db.health_check()?;
    Ok(Json(json!({ "status": "ok" })))
}
