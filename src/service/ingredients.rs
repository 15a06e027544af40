//! Ingredient operations
//!
//! Units are resolved against the catalog before anything is written, and
//! stored in canonical form.

use serde::Serialize;
use tracing::info;

use super::{canonical_unit, require_name, require_non_negative, ApiError, ApiResult, DeleteResponse, ListQuery};
use crate::db::Database;
use crate::models::{Ingredient, IngredientCreate, IngredientUpdate};

const DUPLICATE: &str = "Ingredient already exists.";

/// Ingredient with usage information
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub usage_count: i64,
    pub used_in_recipes: Vec<String>,
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Ingredient with ID {} not found", id))
}

/// Add a new ingredient
pub fn create_ingredient(db: &Database, mut data: IngredientCreate) -> ApiResult<Ingredient> {
    data.name = require_name(&data.name, "Ingredient")?;
    if let Some(amount) = data.amount {
        require_non_negative("amount", amount)?;
    }
    if let Some(field) = data.nutrition.first_invalid() {
        return Err(ApiError::bad_request(format!("{} cannot be negative", field)));
    }
    if let Some(ref unit) = data.unit {
        data.unit = Some(canonical_unit(unit)?.to_string());
    }

    db.with_conn(|conn| {
        if Ingredient::get_by_name(conn, &data.name)?.is_some() {
            return Err(ApiError::bad_request(DUPLICATE));
        }
        let item = Ingredient::create(conn, &data).map_err(ApiError::duplicate(DUPLICATE))?;
        info!("Created ingredient {} ({})", item.id, item.name);
        Ok(item)
    })
}

/// List ingredients in id order
pub fn list_ingredients(db: &Database, query: &ListQuery) -> ApiResult<Vec<Ingredient>> {
    let (limit, offset) = query.page();
    db.with_conn(|conn| Ok(Ingredient::list(conn, query.search(), limit, offset)?))
}

/// Get an ingredient with the recipes that use it
pub fn get_ingredient(db: &Database, id: i64) -> ApiResult<IngredientDetail> {
    db.with_conn(|conn| {
        let ingredient = Ingredient::get_by_id(conn, id)?.ok_or_else(|| not_found(id))?;
        Ok(IngredientDetail {
            usage_count: Ingredient::get_recipe_usage_count(conn, id)?,
            used_in_recipes: Ingredient::get_used_in_recipes(conn, id)?,
            ingredient,
        })
    })
}

/// Partially update an ingredient
pub fn update_ingredient(db: &Database, id: i64, mut data: IngredientUpdate) -> ApiResult<Ingredient> {
    if let Some(ref name) = data.name {
        data.name = Some(require_name(name, "Ingredient")?);
    }
    if let Some(field) = data.first_invalid() {
        return Err(ApiError::bad_request(format!("{} cannot be negative", field)));
    }
    if let Some(ref unit) = data.unit {
        data.unit = Some(canonical_unit(unit)?.to_string());
    }

    db.with_conn(|conn| {
        Ingredient::get_by_id(conn, id)?.ok_or_else(|| not_found(id))?;

        if let Some(ref name) = data.name {
            if let Some(existing) = Ingredient::get_by_name(conn, name)? {
                if existing.id != id {
                    return Err(ApiError::bad_request(DUPLICATE));
                }
            }
        }

        let item = Ingredient::update(conn, id, &data)
            .map_err(ApiError::duplicate(DUPLICATE))?
            .ok_or_else(|| not_found(id))?;
        info!("Updated ingredient {}", id);
        Ok(item)
    })
}

/// Delete an ingredient (blocked while any recipe uses it)
pub fn delete_ingredient(db: &Database, id: i64) -> ApiResult<DeleteResponse> {
    db.with_conn(|conn| {
        if Ingredient::get_by_id(conn, id)?.is_none() {
            return Err(ApiError::bad_request(format!(
                "could not delete ingredient with id: {}; (it probably does not exist anymore)",
                id
            )));
        }

        let usage_count = Ingredient::get_recipe_usage_count(conn, id)?;
        if usage_count > 0 {
            let recipes = Ingredient::get_used_in_recipes(conn, id)?;
            return Err(ApiError::Conflict(format!(
                "Cannot delete ingredient: used in {} recipe(s): {}",
                usage_count,
                recipes.join(", ")
            )));
        }

        Ingredient::delete(conn, id)?;
        info!("Deleted ingredient {}", id);
        Ok(DeleteResponse {
            details: format!("deleted ingredient with id: {}", id),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;
    use crate::service::test_support::test_db;

    fn milk() -> IngredientCreate {
        IngredientCreate {
            name: "whole milk".to_string(),
            amount: Some(1.0),
            unit: Some("Cup".to_string()),
            nutrition: Nutrition {
                calories_kcal: 149.0,
                protein_g: 7.7,
                ..Nutrition::default()
            },
        }
    }

    #[test]
    fn test_create_stores_canonical_unit() {
        let (_dir, db) = test_db();
        let item = create_ingredient(&db, milk()).unwrap();
        assert_eq!(item.unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_dir, db) = test_db();

        let err = create_ingredient(
            &db,
            IngredientCreate {
                unit: Some("pinch".to_string()),
                ..milk()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid unit: 'pinch'");

        let err = create_ingredient(
            &db,
            IngredientCreate {
                amount: Some(-1.0),
                ..milk()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        create_ingredient(&db, milk()).unwrap();
        let err = create_ingredient(&db, milk()).unwrap_err();
        assert_eq!(err.to_string(), DUPLICATE);
    }

    #[test]
    fn test_update_validates_unit_before_writing() {
        let (_dir, db) = test_db();
        let item = create_ingredient(&db, milk()).unwrap();

        let err = update_ingredient(
            &db,
            item.id,
            IngredientUpdate {
                name: Some("skim milk".to_string()),
                unit: Some("bucket".to_string()),
                ..IngredientUpdate::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid unit: 'bucket'");
        assert_eq!(get_ingredient(&db, item.id).unwrap().ingredient.name, "whole milk");

        let updated = update_ingredient(
            &db,
            item.id,
            IngredientUpdate {
                unit: Some("ML".to_string()),
                amount: Some(240.0),
                ..IngredientUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(updated.unit.as_deref(), Some("ml"));
        assert_eq!(updated.amount, Some(240.0));
    }

    #[test]
    fn test_update_rename_collision_and_missing() {
        let (_dir, db) = test_db();
        create_ingredient(&db, milk()).unwrap();
        let oats = create_ingredient(
            &db,
            IngredientCreate {
                name: "oats".to_string(),
                ..IngredientCreate::default()
            },
        )
        .unwrap();

        let rename = IngredientUpdate {
            name: Some("whole milk".to_string()),
            ..IngredientUpdate::default()
        };
        assert_eq!(update_ingredient(&db, oats.id, rename.clone()).unwrap_err().to_string(), DUPLICATE);
        assert!(matches!(update_ingredient(&db, 999, rename), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_delete_missing() {
        let (_dir, db) = test_db();
        let err = delete_ingredient(&db, 3).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let item = create_ingredient(&db, milk()).unwrap();
        let deleted = delete_ingredient(&db, item.id).unwrap();
        assert_eq!(deleted.details, format!("deleted ingredient with id: {}", item.id));
    }
}
