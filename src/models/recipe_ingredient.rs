//! Recipe ingredient model
//!
//! One line of a recipe: an ingredient with the amount and unit the recipe
//! calls for.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// An ingredient line within a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: f64,
    pub unit: String,
}

/// Ingredient line with the ingredient's name, for recipe detail views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub amount: f64,
    pub unit: String,
}

/// Data for adding an ingredient line to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub ingredient_id: i64,
    pub amount: f64,
    pub unit: String,
}

/// Data for updating an ingredient line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl RecipeIngredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            ingredient_id: row.get("ingredient_id")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
        })
    }

    /// Add an ingredient line to a recipe
    pub fn create(conn: &Connection, recipe_id: i64, data: &RecipeIngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes_ingredients (recipe_id, ingredient_id, amount, unit)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![recipe_id, data.ingredient_id, data.amount, data.unit],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a line by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let line = conn
            .query_row("SELECT * FROM recipes_ingredients WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(line)
    }

    /// Get a line by ID, only if it belongs to the given recipe
    pub fn get_in_recipe(conn: &Connection, recipe_id: i64, id: i64) -> DbResult<Option<Self>> {
        let line = conn
            .query_row(
                "SELECT * FROM recipes_ingredients WHERE id = ?1 AND recipe_id = ?2",
                [id, recipe_id],
                Self::from_row,
            )
            .optional()?;
        Ok(line)
    }

    /// Whether the recipe already has a line for this ingredient
    pub fn exists_for(conn: &Connection, recipe_id: i64, ingredient_id: i64) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes_ingredients WHERE recipe_id = ?1 AND ingredient_id = ?2",
            [recipe_id, ingredient_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All lines of a recipe in insertion order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipes_ingredients WHERE recipe_id = ?1 ORDER BY id",
        )?;

        let lines = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lines)
    }

    /// All lines of a recipe joined with ingredient names
    pub fn get_details_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<RecipeIngredientDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT ri.id, ri.ingredient_id, i.name AS ingredient_name, ri.amount, ri.unit
            FROM recipes_ingredients ri
            INNER JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.id
            "#,
        )?;

        let details = stmt
            .query_map([recipe_id], |row| {
                Ok(RecipeIngredientDetail {
                    id: row.get("id")?,
                    ingredient_id: row.get("ingredient_id")?,
                    ingredient_name: row.get("ingredient_name")?,
                    amount: row.get("amount")?,
                    unit: row.get("unit")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Update a line
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(amount) = data.amount {
            updates.push(format!("amount = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(amount));
        }
        if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE recipes_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Remove a line
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_conn, Ingredient, IngredientCreate, Recipe, RecipeCreate};

    fn setup(conn: &Connection) -> (i64, i64) {
        let recipe = Recipe::create(
            conn,
            &RecipeCreate {
                name: "pancakes".to_string(),
                ..RecipeCreate::default()
            },
        )
        .unwrap();
        let flour = Ingredient::create(
            conn,
            &IngredientCreate {
                name: "flour".to_string(),
                amount: Some(1.0),
                unit: Some("cup".to_string()),
                ..IngredientCreate::default()
            },
        )
        .unwrap();
        (recipe.id, flour.id)
    }

    #[test]
    fn test_add_and_list_details() {
        let conn = test_conn();
        let (recipe_id, flour_id) = setup(&conn);

        let line = RecipeIngredient::create(
            &conn,
            recipe_id,
            &RecipeIngredientCreate {
                ingredient_id: flour_id,
                amount: 1.5,
                unit: "cup".to_string(),
            },
        )
        .unwrap();
        assert!(RecipeIngredient::exists_for(&conn, recipe_id, flour_id).unwrap());

        let details = RecipeIngredient::get_details_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].id, line.id);
        assert_eq!(details[0].ingredient_name, "flour");
        assert_eq!(details[0].amount, 1.5);
    }

    #[test]
    fn test_duplicate_line_is_constraint_violation() {
        let conn = test_conn();
        let (recipe_id, flour_id) = setup(&conn);
        let data = RecipeIngredientCreate {
            ingredient_id: flour_id,
            amount: 1.0,
            unit: "cup".to_string(),
        };
        RecipeIngredient::create(&conn, recipe_id, &data).unwrap();
        let err = RecipeIngredient::create(&conn, recipe_id, &data).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_used_ingredient_cannot_be_deleted() {
        let conn = test_conn();
        let (recipe_id, flour_id) = setup(&conn);
        RecipeIngredient::create(
            &conn,
            recipe_id,
            &RecipeIngredientCreate {
                ingredient_id: flour_id,
                amount: 2.0,
                unit: "cup".to_string(),
            },
        )
        .unwrap();

        assert_eq!(Ingredient::get_recipe_usage_count(&conn, flour_id).unwrap(), 1);
        assert_eq!(Ingredient::get_used_in_recipes(&conn, flour_id).unwrap(), ["pancakes"]);
        assert!(Ingredient::delete(&conn, flour_id).unwrap_err().is_constraint_violation());

        Recipe::delete(&conn, recipe_id).unwrap();
        assert!(RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap().is_empty());
        assert!(Ingredient::delete(&conn, flour_id).unwrap());
    }

    #[test]
    fn test_update_and_scope_to_recipe() {
        let conn = test_conn();
        let (recipe_id, flour_id) = setup(&conn);
        let line = RecipeIngredient::create(
            &conn,
            recipe_id,
            &RecipeIngredientCreate {
                ingredient_id: flour_id,
                amount: 1.0,
                unit: "cup".to_string(),
            },
        )
        .unwrap();

        let updated = RecipeIngredient::update(
            &conn,
            line.id,
            &RecipeIngredientUpdate {
                unit: Some("g".to_string()),
                ..RecipeIngredientUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.unit, "g");
        assert_eq!(updated.amount, 1.0);

        assert!(RecipeIngredient::get_in_recipe(&conn, recipe_id, line.id).unwrap().is_some());
        assert!(RecipeIngredient::get_in_recipe(&conn, recipe_id + 1, line.id).unwrap().is_none());

        assert!(RecipeIngredient::delete(&conn, line.id).unwrap());
        assert!(!RecipeIngredient::delete(&conn, line.id).unwrap());
    }
}
