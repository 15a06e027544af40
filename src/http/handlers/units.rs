//! /units

use axum::{extract::Path, Json};

use crate::service::units::{self, ConvertRequest, ConvertResponse, UnitInfo};
use crate::service::ApiError;

pub async fn list() -> Json<Vec<UnitInfo>> {
    Json(units::list_units())
}

pub async fn get(Path(label): Path<String>) -> Result<Json<UnitInfo>, ApiError> {
    Ok(Json(units::get_unit(&label)?))
}

pub async fn convert(Json(body): Json<ConvertRequest>) -> Result<Json<ConvertResponse>, ApiError> {
    Ok(Json(units::convert_quantity(&body)?))
}
