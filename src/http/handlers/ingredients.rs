//! /ingredients

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::http::AppState;
use crate::models::{Ingredient, IngredientCreate, IngredientUpdate};
use crate::service::ingredients::{self, IngredientDetail};
use crate::service::{ApiError, DeleteResponse, ListQuery};

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<IngredientCreate>,
) -> Result<(StatusCode, Json<Ingredient>), ApiError> {
    let item = state.run(move |db| ingredients::create_ingredient(db, body)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    Ok(Json(state.run(move |db| ingredients::list_ingredients(db, &query)).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<IngredientDetail>, ApiError> {
    Ok(Json(state.run(move |db| ingredients::get_ingredient(db, id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<IngredientUpdate>,
) -> Result<Json<Ingredient>, ApiError> {
    Ok(Json(state.run(move |db| ingredients::update_ingredient(db, id, body)).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.run(move |db| ingredients::delete_ingredient(db, id)).await?))
}
