//! /recipes and their tag and ingredient sub-resources

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::http::AppState;
use crate::models::{RecipeCreate, RecipeIngredientCreate, RecipeIngredientUpdate, RecipeSummary, RecipeUpdate};
use crate::service::recipes::{self, RecipeDetail, RecipeListQuery, RecipeNutrition, ScaledRecipe};
use crate::service::{ApiError, DeleteResponse};

#[derive(Debug, Deserialize)]
pub struct ScaleQuery {
    pub factor: f64,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<RecipeCreate>,
) -> Result<(StatusCode, Json<RecipeDetail>), ApiError> {
    let recipe = state.run(move |db| recipes::create_recipe(db, body)).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    Ok(Json(state.run(move |db| recipes::list_recipes(db, &query)).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::get_recipe(db, id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RecipeUpdate>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::update_recipe(db, id, body)).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.run(move |db| recipes::delete_recipe(db, id)).await?))
}

pub async fn scaled(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ScaleQuery>,
) -> Result<Json<ScaledRecipe>, ApiError> {
    Ok(Json(state.run(move |db| recipes::scale_recipe(db, id, query.factor)).await?))
}

pub async fn nutrition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeNutrition>, ApiError> {
    Ok(Json(state.run(move |db| recipes::recipe_nutrition(db, id)).await?))
}

pub async fn add_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::add_recipe_tag(db, id, tag_id)).await?))
}

pub async fn remove_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::remove_recipe_tag(db, id, tag_id)).await?))
}

pub async fn add_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RecipeIngredientCreate>,
) -> Result<(StatusCode, Json<RecipeDetail>), ApiError> {
    let recipe = state.run(move |db| recipes::add_recipe_ingredient(db, id, body)).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(i64, i64)>,
    Json(body): Json<RecipeIngredientUpdate>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::update_recipe_ingredient(db, id, line_id, body)).await?))
}

pub async fn remove_ingredient(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(i64, i64)>,
) -> Result<Json<RecipeDetail>, ApiError> {
    Ok(Json(state.run(move |db| recipes::remove_recipe_ingredient(db, id, line_id)).await?))
}
