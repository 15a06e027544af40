//! Recipe operations
//!
//! Besides CRUD this covers tag links, ingredient lines, scaling and the
//! nutrition rollup that converts each line into its ingredient's reference
//! unit.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{canonical_unit, require_name, require_non_negative, ApiError, ApiResult, DeleteResponse, ListQuery};
use crate::db::Database;
use crate::models::{
    Ingredient, Nutrition, Recipe, RecipeCreate, RecipeFilter, RecipeIngredient,
    RecipeIngredientCreate, RecipeIngredientDetail, RecipeIngredientUpdate, RecipeSummary,
    RecipeUpdate, Tag,
};
use crate::units::{resolve, round2, UnitDefinition, UnitError, UnitFamily};

const DUPLICATE: &str = "Recipe already exists.";

/// Query parameters for listing recipes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub q: Option<String>,
    pub tag_id: Option<i64>,
    pub ingredient_id: Option<i64>,
}

/// Full recipe with tags and ingredient lines
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub notes: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for a scaled recipe
#[derive(Debug, Serialize)]
pub struct ScaledRecipe {
    pub factor: f64,
    #[serde(flatten)]
    pub recipe: RecipeDetail,
}

/// A line whose nutrition could not be derived
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnconvertedLine {
    pub line_id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub reason: String,
}

/// Nutrition totals for a recipe
#[derive(Debug, Serialize)]
pub struct RecipeNutrition {
    pub recipe_id: i64,
    pub name: String,
    pub nutrition: Nutrition,
    pub total_volume_ml: f64,
    pub total_mass_g: f64,
    pub unconverted: Vec<UnconvertedLine>,
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Recipe with ID {} not found", id))
}

fn require_recipe(conn: &Connection, id: i64) -> ApiResult<Recipe> {
    Recipe::get_by_id(conn, id)?.ok_or_else(|| not_found(id))
}

fn load_detail(conn: &Connection, recipe: Recipe) -> ApiResult<RecipeDetail> {
    Ok(RecipeDetail {
        tags: Tag::get_for_recipe(conn, recipe.id)?,
        ingredients: RecipeIngredient::get_details_for_recipe(conn, recipe.id)?,
        id: recipe.id,
        name: recipe.name,
        notes: recipe.notes,
        instructions: recipe.instructions,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

/// Create a recipe
pub fn create_recipe(db: &Database, mut data: RecipeCreate) -> ApiResult<RecipeDetail> {
    data.name = require_name(&data.name, "Recipe")?;

    db.with_conn(|conn| {
        if Recipe::get_by_name(conn, &data.name)?.is_some() {
            return Err(ApiError::bad_request(DUPLICATE));
        }
        let recipe = Recipe::create(conn, &data).map_err(ApiError::duplicate(DUPLICATE))?;
        info!("Created recipe {} ({})", recipe.id, recipe.name);
        load_detail(conn, recipe)
    })
}

/// List recipe summaries, optionally filtered by name, tag or ingredient
pub fn list_recipes(db: &Database, query: &RecipeListQuery) -> ApiResult<Vec<RecipeSummary>> {
    let page = ListQuery {
        skip: query.skip.unwrap_or(0),
        limit: query.limit.unwrap_or(ListQuery::default().limit),
        q: query.q.clone(),
    };
    let (limit, offset) = page.page();
    let filter = RecipeFilter {
        query: page.search(),
        tag_id: query.tag_id,
        ingredient_id: query.ingredient_id,
    };

    db.with_conn(|conn| Ok(Recipe::list(conn, &filter, limit, offset)?))
}

pub fn get_recipe(db: &Database, id: i64) -> ApiResult<RecipeDetail> {
    db.with_conn(|conn| {
        let recipe = require_recipe(conn, id)?;
        load_detail(conn, recipe)
    })
}

/// Update a recipe's name, notes or instructions
pub fn update_recipe(db: &Database, id: i64, mut data: RecipeUpdate) -> ApiResult<RecipeDetail> {
    if let Some(ref name) = data.name {
        data.name = Some(require_name(name, "Recipe")?);
    }

    db.with_conn(|conn| {
        require_recipe(conn, id)?;
        if let Some(ref name) = data.name {
            if let Some(existing) = Recipe::get_by_name(conn, name)? {
                if existing.id != id {
                    return Err(ApiError::bad_request(DUPLICATE));
                }
            }
        }

        let recipe = Recipe::update(conn, id, &data)
            .map_err(ApiError::duplicate(DUPLICATE))?
            .ok_or_else(|| not_found(id))?;
        info!("Updated recipe {}", id);
        load_detail(conn, recipe)
    })
}

/// Delete a recipe with its tag links and ingredient lines
pub fn delete_recipe(db: &Database, id: i64) -> ApiResult<DeleteResponse> {
    db.with_conn(|conn| {
        if !Recipe::delete(conn, id)? {
            return Err(ApiError::bad_request(format!(
                "could not delete recipe with id: {}; (it probably does not exist anymore)",
                id
            )));
        }
        info!("Deleted recipe {}", id);
        Ok(DeleteResponse {
            details: format!("deleted recipe with id: {}", id),
        })
    })
}

/// Attach a tag; attaching twice is a no-op
pub fn add_recipe_tag(db: &Database, recipe_id: i64, tag_id: i64) -> ApiResult<RecipeDetail> {
    db.with_conn(|conn| {
        let recipe = require_recipe(conn, recipe_id)?;
        Tag::get_by_id(conn, tag_id)?
            .ok_or_else(|| ApiError::not_found(format!("Tag with ID {} not found", tag_id)))?;

        if Recipe::add_tag(conn, recipe_id, tag_id)? {
            info!("Tagged recipe {} with tag {}", recipe_id, tag_id);
        }
        load_detail(conn, recipe)
    })
}

/// Detach a tag
pub fn remove_recipe_tag(db: &Database, recipe_id: i64, tag_id: i64) -> ApiResult<RecipeDetail> {
    db.with_conn(|conn| {
        let recipe = require_recipe(conn, recipe_id)?;
        if !Recipe::remove_tag(conn, recipe_id, tag_id)? {
            return Err(ApiError::not_found(format!(
                "Tag with ID {} is not attached to recipe {}",
                tag_id, recipe_id
            )));
        }
        info!("Removed tag {} from recipe {}", tag_id, recipe_id);
        load_detail(conn, recipe)
    })
}

/// Add an ingredient line; each ingredient appears at most once per recipe
pub fn add_recipe_ingredient(
    db: &Database,
    recipe_id: i64,
    mut data: RecipeIngredientCreate,
) -> ApiResult<RecipeDetail> {
    require_non_negative("amount", data.amount)?;
    data.unit = canonical_unit(&data.unit)?.to_string();

    db.with_transaction(|tx| {
        let recipe = require_recipe(tx, recipe_id)?;
        let ingredient = Ingredient::get_by_id(tx, data.ingredient_id)?.ok_or_else(|| {
            ApiError::not_found(format!("Ingredient with ID {} not found", data.ingredient_id))
        })?;

        let duplicate = "Ingredient is already part of this recipe.";
        if RecipeIngredient::exists_for(tx, recipe_id, ingredient.id)? {
            return Err(ApiError::bad_request(duplicate));
        }
        let line = RecipeIngredient::create(tx, recipe_id, &data)
            .map_err(ApiError::duplicate(duplicate))?;
        info!("Added ingredient {} to recipe {} as line {}", ingredient.id, recipe_id, line.id);
        load_detail(tx, recipe)
    })
}

/// Change the amount or unit of a line
pub fn update_recipe_ingredient(
    db: &Database,
    recipe_id: i64,
    line_id: i64,
    mut data: RecipeIngredientUpdate,
) -> ApiResult<RecipeDetail> {
    if let Some(amount) = data.amount {
        require_non_negative("amount", amount)?;
    }
    if let Some(ref unit) = data.unit {
        data.unit = Some(canonical_unit(unit)?.to_string());
    }

    db.with_transaction(|tx| {
        let recipe = require_recipe(tx, recipe_id)?;
        RecipeIngredient::get_in_recipe(tx, recipe_id, line_id)?
            .ok_or_else(|| line_not_found(recipe_id, line_id))?;
        RecipeIngredient::update(tx, line_id, &data)?;
        info!("Updated line {} of recipe {}", line_id, recipe_id);
        load_detail(tx, recipe)
    })
}

/// Remove a line
pub fn remove_recipe_ingredient(db: &Database, recipe_id: i64, line_id: i64) -> ApiResult<RecipeDetail> {
    db.with_conn(|conn| {
        let recipe = require_recipe(conn, recipe_id)?;
        RecipeIngredient::get_in_recipe(conn, recipe_id, line_id)?
            .ok_or_else(|| line_not_found(recipe_id, line_id))?;
        RecipeIngredient::delete(conn, line_id)?;
        info!("Removed line {} from recipe {}", line_id, recipe_id);
        load_detail(conn, recipe)
    })
}

fn line_not_found(recipe_id: i64, line_id: i64) -> ApiError {
    ApiError::not_found(format!(
        "Ingredient line with ID {} not found in recipe {}",
        line_id, recipe_id
    ))
}

/// The recipe with every ingredient amount multiplied by `factor` (not persisted)
pub fn scale_recipe(db: &Database, id: i64, factor: f64) -> ApiResult<ScaledRecipe> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ApiError::bad_request("factor must be greater than 0"));
    }

    let mut recipe = get_recipe(db, id)?;
    for line in recipe.ingredients.iter_mut() {
        line.amount *= factor;
    }
    Ok(ScaledRecipe { factor, recipe })
}

/// How many of the ingredient's reference quantities a line uses
fn line_multiplier(
    amount: f64,
    unit: &UnitDefinition,
    ingredient: &Ingredient,
) -> Result<f64, String> {
    let (ref_amount, ref_label) = match (ingredient.amount, ingredient.unit.as_deref()) {
        (Some(a), Some(u)) if a > 0.0 => (a, u),
        _ => return Err("ingredient has no reference quantity".to_string()),
    };
    let reference = resolve(ref_label).map_err(|e| e.to_string())?;

    if unit.family() != reference.family() {
        return Err(UnitError::incompatible(unit, reference).to_string());
    }

    // Full precision here; rounding is applied once to the recipe totals
    match (unit.base_factor(), reference.base_factor()) {
        (Some(from), Some(to)) => Ok(amount * from / to / ref_amount),
        _ if unit.label == reference.label => Ok(amount / ref_amount),
        _ => Err(UnitError::incompatible(unit, reference).to_string()),
    }
}

/// Total nutrition of a recipe, converting each line into its ingredient's reference unit
pub fn recipe_nutrition(db: &Database, id: i64) -> ApiResult<RecipeNutrition> {
    db.with_conn(|conn| {
        let recipe = require_recipe(conn, id)?;
        let lines = RecipeIngredient::get_details_for_recipe(conn, id)?;

        let mut nutrition = Nutrition::zero();
        let mut total_volume_ml = 0.0;
        let mut total_mass_g = 0.0;
        let mut unconverted = Vec::new();

        for line in lines {
            let ingredient = Ingredient::get_by_id(conn, line.ingredient_id)?
                .ok_or_else(|| ApiError::not_found(format!("Ingredient with ID {} not found", line.ingredient_id)))?;

            let unit = match resolve(&line.unit) {
                Ok(unit) => unit,
                Err(e) => {
                    unconverted.push(UnconvertedLine {
                        line_id: line.id,
                        ingredient_id: line.ingredient_id,
                        ingredient_name: line.ingredient_name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(factor) = unit.base_factor() {
                match unit.family() {
                    UnitFamily::Volume => total_volume_ml += line.amount * factor,
                    UnitFamily::Mass => total_mass_g += line.amount * factor,
                    UnitFamily::Count => {}
                }
            }

            match line_multiplier(line.amount, unit, &ingredient) {
                Ok(multiplier) => nutrition = nutrition + ingredient.nutrition * multiplier,
                Err(reason) => {
                    debug!("Line {} of recipe {} left out of nutrition: {}", line.id, id, reason);
                    unconverted.push(UnconvertedLine {
                        line_id: line.id,
                        ingredient_id: line.ingredient_id,
                        ingredient_name: line.ingredient_name,
                        reason,
                    });
                }
            }
        }

        Ok(RecipeNutrition {
            recipe_id: recipe.id,
            name: recipe.name,
            nutrition: nutrition.rounded(),
            total_volume_ml: round2(total_volume_ml),
            total_mass_g: round2(total_mass_g),
            unconverted,
        })
    })
}
