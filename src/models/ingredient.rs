//! Ingredient model
//!
//! An ingredient carries nutrition values for a reference quantity
//! (`amount` of `unit`), e.g. 100 g of black beans.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{contains_pattern, Nutrition};

/// An ingredient with nutritional information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

/// Data for updating an ingredient; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbohydrates_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub potassium_mg: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub cholesterol_mg: Option<f64>,
}

impl IngredientUpdate {
    /// Name of the first negative numeric field, if any
    pub fn first_invalid(&self) -> Option<&'static str> {
        [
            ("amount", self.amount),
            ("calories_kcal", self.calories_kcal),
            ("protein_g", self.protein_g),
            ("carbohydrates_g", self.carbohydrates_g),
            ("sugar_g", self.sugar_g),
            ("fat_g", self.fat_g),
            ("saturated_fat_g", self.saturated_fat_g),
            ("fiber_g", self.fiber_g),
            ("potassium_mg", self.potassium_mg),
            ("sodium_mg", self.sodium_mg),
            ("cholesterol_mg", self.cholesterol_mg),
        ]
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| v.is_nan() || v < 0.0))
        .map(|(name, _)| name)
    }
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
            nutrition: Nutrition {
                calories_kcal: row.get("calories_kcal")?,
                protein_g: row.get("protein_g")?,
                carbohydrates_g: row.get("carbohydrates_g")?,
                sugar_g: row.get("sugar_g")?,
                fat_g: row.get("fat_g")?,
                saturated_fat_g: row.get("saturated_fat_g")?,
                fiber_g: row.get("fiber_g")?,
                potassium_mg: row.get("potassium_mg")?,
                sodium_mg: row.get("sodium_mg")?,
                cholesterol_mg: row.get("cholesterol_mg")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new ingredient
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        let n = &data.nutrition;
        conn.execute(
            r#"
            INSERT INTO ingredients (
                name, amount, unit,
                calories_kcal, protein_g, carbohydrates_g, sugar_g, fat_g,
                saturated_fat_g, fiber_g, potassium_mg, sodium_mg, cholesterol_mg
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                data.name,
                data.amount,
                data.unit,
                n.calories_kcal,
                n.protein_g,
                n.carbohydrates_g,
                n.sugar_g,
                n.fat_g,
                n.saturated_fat_g,
                n.fiber_g,
                n.potassium_mg,
                n.sodium_mg,
                n.cholesterol_mg,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let item = conn
            .query_row("SELECT * FROM ingredients WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(item)
    }

    /// Get an ingredient by exact name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let item = conn
            .query_row("SELECT * FROM ingredients WHERE name = ?1", [name], Self::from_row)
            .optional()?;
        Ok(item)
    }

    /// List ingredients in id order, optionally filtered by a name substring
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let pattern = contains_pattern(query);
        let mut stmt = conn.prepare(
            "SELECT * FROM ingredients WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id LIMIT ?2 OFFSET ?3",
        )?;

        let items = stmt
            .query_map(params![pattern, limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &IngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", stringify!($field), params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name);
        add_update!(amount);
        add_update!(unit);
        add_update!(calories_kcal);
        add_update!(protein_g);
        add_update!(carbohydrates_g);
        add_update!(sugar_g);
        add_update!(fat_g);
        add_update!(saturated_fat_g);
        add_update!(fiber_g);
        add_update!(potassium_mg);
        add_update!(sodium_mg);
        add_update!(cholesterol_mg);

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows == 0 {
            return Ok(None);
        }

        Self::get_by_id(conn, id)
    }

    /// Number of recipes using this ingredient
    pub fn get_recipe_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes_ingredients WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Names of recipes using this ingredient
    pub fn get_used_in_recipes(conn: &Connection, id: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT r.name FROM recipes r
            INNER JOIN recipes_ingredients ri ON r.id = ri.recipe_id
            WHERE ri.ingredient_id = ?1
            ORDER BY r.name
            "#,
        )?;

        let names = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Delete an ingredient
    /// Fails with a constraint violation while any recipe uses it
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
