//! Tag model
//!
//! Free-form labels attached to recipes ("dinner", "vegan").

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::contains_pattern;
use crate::db::DbResult;

/// A tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Data for creating a new tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
}

impl Tag {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new tag
    pub fn create(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute("INSERT INTO tags (name) VALUES (?1)", [name])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a tag by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let tag = conn
            .query_row("SELECT * FROM tags WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(tag)
    }

    /// Get a tag by exact name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let tag = conn
            .query_row("SELECT * FROM tags WHERE name = ?1", [name], Self::from_row)
            .optional()?;
        Ok(tag)
    }

    /// List tags in id order, optionally filtered by a name substring
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let pattern = contains_pattern(query);
        let mut stmt = conn.prepare(
            "SELECT * FROM tags WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id LIMIT ?2 OFFSET ?3",
        )?;

        let tags = stmt
            .query_map(params![pattern, limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Tags attached to a recipe
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.* FROM tags t
            INNER JOIN recipes_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = ?1
            ORDER BY t.name
            "#,
        )?;

        let tags = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Delete a tag; links to recipes cascade
    /// Returns Ok(false) if the tag did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
