//! Request handlers, one module per resource

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod units;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::service::status::ServerStatus;
use crate::service::ApiError;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "msg": "Hello, World!" }))
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Result<Json<ServerStatus>, ApiError> {
    let tracker = state.status.clone();
    Ok(Json(state.run(move |db| tracker.get_status(db)).await?))
}
