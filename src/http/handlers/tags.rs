//! /tags

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::http::AppState;
use crate::models::{Tag, TagCreate};
use crate::service::{tags, ApiError, DeleteResponse, ListQuery};

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<TagCreate>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.run(move |db| tags::create_tag(db, body)).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.run(move |db| tags::list_tags(db, &query)).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.run(move |db| tags::get_tag(db, id)).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.run(move |db| tags::delete_tag(db, id)).await?))
}
