//! Recipe model
//!
//! A recipe owns free-text notes and ordered instruction steps. Tags and
//! ingredient lines live in the `recipes_tags` and `recipes_ingredients`
//! link tables.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::contains_pattern;
use crate::db::DbResult;

/// A recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub notes: Vec<String>,
    pub instructions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub notes: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
}

/// Summary of a recipe for list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
}

/// Filters for listing recipes
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter<'a> {
    pub query: Option<&'a str>,
    pub tag_id: Option<i64>,
    pub ingredient_id: Option<i64>,
}

fn json_list(row: &Row, column: &str) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(column)?;
    let index = row.as_ref().column_index(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

impl Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            notes: json_list(row, "notes")?,
            instructions: json_list(row, "instructions")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO recipes (name, notes, instructions) VALUES (?1, ?2, ?3)",
            params![
                data.name,
                serde_json::to_string(&data.notes)?,
                serde_json::to_string(&data.instructions)?,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let recipe = conn
            .query_row("SELECT * FROM recipes WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(recipe)
    }

    /// Get a recipe by exact name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let recipe = conn
            .query_row("SELECT * FROM recipes WHERE name = ?1", [name], Self::from_row)
            .optional()?;
        Ok(recipe)
    }

    /// List recipe summaries in id order
    pub fn list(
        conn: &Connection,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<RecipeSummary>> {
        let mut sql = String::from("SELECT r.id, r.name FROM recipes r WHERE r.name LIKE ?1 ESCAPE '\\'");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(contains_pattern(filter.query))];

        if let Some(tag_id) = filter.tag_id {
            params_vec.push(Box::new(tag_id));
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM recipes_tags rt WHERE rt.recipe_id = r.id AND rt.tag_id = ?{})",
                params_vec.len()
            ));
        }

        if let Some(ingredient_id) = filter.ingredient_id {
            params_vec.push(Box::new(ingredient_id));
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM recipes_ingredients ri WHERE ri.recipe_id = r.id AND ri.ingredient_id = ?{})",
                params_vec.len()
            ));
        }

        sql.push_str(&format!(
            " ORDER BY r.id LIMIT ?{} OFFSET ?{}",
            params_vec.len() + 1,
            params_vec.len() + 2
        ));
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(RecipeSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Update a recipe
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(notes)?));
        }
        if let Some(ref instructions) = data.instructions {
            updates.push(format!("instructions = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(instructions)?));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
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

    /// Delete a recipe; its tag links and ingredient lines cascade
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Attach a tag. Returns false if it was already attached.
    pub fn add_tag(conn: &Connection, recipe_id: i64, tag_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO recipes_tags (recipe_id, tag_id) VALUES (?1, ?2)",
            [recipe_id, tag_id],
        )?;
        Ok(rows > 0)
    }

    /// Detach a tag. Returns false if it was not attached.
    pub fn remove_tag(conn: &Connection, recipe_id: i64, tag_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM recipes_tags WHERE recipe_id = ?1 AND tag_id = ?2",
            [recipe_id, tag_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_conn, Ingredient, IngredientCreate, Tag};

    fn chili() -> RecipeCreate {
        RecipeCreate {
            name: "chili".to_string(),
            notes: vec!["freezes well".to_string()],
            instructions: vec!["brown the beef".to_string(), "add beans".to_string()],
        }
    }

    #[test]
    fn test_create_round_trips_lists() {
        let conn = test_conn();
        let recipe = Recipe::create(&conn, &chili()).unwrap();
        assert_eq!(recipe.notes, ["freezes well"]);
        assert_eq!(recipe.instructions.len(), 2);

        let fetched = Recipe::get_by_name(&conn, "chili").unwrap().unwrap();
        assert_eq!(fetched, recipe);
    }

    #[test]
    fn test_update_replaces_lists() {
        let conn = test_conn();
        let recipe = Recipe::create(&conn, &chili()).unwrap();

        let updated = Recipe::update(
            &conn,
            recipe.id,
            &RecipeUpdate {
                instructions: Some(vec!["simmer".to_string()]),
                ..RecipeUpdate::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.instructions, ["simmer"]);
        assert_eq!(updated.notes, ["freezes well"]);
        assert!(Recipe::update(&conn, 999, &RecipeUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_tag_links_are_idempotent_and_cascade() {
        let conn = test_conn();
        let recipe = Recipe::create(&conn, &chili()).unwrap();
        let tag = Tag::create(&conn, "dinner").unwrap();

        assert!(Recipe::add_tag(&conn, recipe.id, tag.id).unwrap());
        assert!(!Recipe::add_tag(&conn, recipe.id, tag.id).unwrap());
        assert_eq!(Tag::get_for_recipe(&conn, recipe.id).unwrap(), vec![tag.clone()]);

        Tag::delete(&conn, tag.id).unwrap();
        assert!(Tag::get_for_recipe(&conn, recipe.id).unwrap().is_empty());
        assert!(!Recipe::remove_tag(&conn, recipe.id, tag.id).unwrap());
    }

    #[test]
    fn test_list_filters() {
        let conn = test_conn();
        let chili = Recipe::create(&conn, &chili()).unwrap();
        let tacos = Recipe::create(
            &conn,
            &RecipeCreate {
                name: "beef tacos".to_string(),
                ..RecipeCreate::default()
            },
        )
        .unwrap();
        Recipe::create(
            &conn,
            &RecipeCreate {
                name: "salad".to_string(),
                ..RecipeCreate::default()
            },
        )
        .unwrap();

        let dinner = Tag::create(&conn, "dinner").unwrap();
        Recipe::add_tag(&conn, chili.id, dinner.id).unwrap();
        Recipe::add_tag(&conn, tacos.id, dinner.id).unwrap();

        let beans = Ingredient::create(
            &conn,
            &IngredientCreate {
                name: "beans".to_string(),
                ..IngredientCreate::default()
            },
        )
        .unwrap();
        conn.execute(
            "INSERT INTO recipes_ingredients (recipe_id, ingredient_id, amount, unit) VALUES (?1, ?2, 1, 'cup')",
            [chili.id, beans.id],
        )
        .unwrap();

        let all = Recipe::list(&conn, &RecipeFilter::default(), 100, 0).unwrap();
        assert_eq!(all.len(), 3);

        let tagged = RecipeFilter {
            tag_id: Some(dinner.id),
            ..RecipeFilter::default()
        };
        assert_eq!(Recipe::list(&conn, &tagged, 100, 0).unwrap().len(), 2);

        let tagged_with_beans = RecipeFilter {
            ingredient_id: Some(beans.id),
            ..tagged.clone()
        };
        let found = Recipe::list(&conn, &tagged_with_beans, 100, 0).unwrap();
        assert_eq!(found, vec![RecipeSummary { id: chili.id, name: "chili".to_string() }]);

        let by_name = RecipeFilter {
            query: Some("taco"),
            ..RecipeFilter::default()
        };
        assert_eq!(Recipe::list(&conn, &by_name, 100, 0).unwrap()[0].id, tacos.id);

        let wildcard = RecipeFilter {
            query: Some("_"),
            ..RecipeFilter::default()
        };
        assert!(Recipe::list(&conn, &wildcard, 100, 0).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        let recipe = Recipe::create(&conn, &chili()).unwrap();
        assert!(Recipe::delete(&conn, recipe.id).unwrap());
        assert!(Recipe::get_by_id(&conn, recipe.id).unwrap().is_none());
        assert!(!Recipe::delete(&conn, recipe.id).unwrap());
    }
}
