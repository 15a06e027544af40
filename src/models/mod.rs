//! Data models
//!
//! Rust structs representing database entities.

mod ingredient;
mod nutrition;
mod recipe;
mod recipe_ingredient;
mod tag;

pub use ingredient::{Ingredient, IngredientCreate, IngredientUpdate};
pub use nutrition::Nutrition;
pub use recipe::{Recipe, RecipeCreate, RecipeFilter, RecipeSummary, RecipeUpdate};
pub use recipe_ingredient::{
    RecipeIngredient, RecipeIngredientCreate, RecipeIngredientDetail, RecipeIngredientUpdate,
};
pub use tag::{Tag, TagCreate};

/// `LIKE` pattern matching `query` anywhere in a value. Wildcards in the
/// query are escaped with `\`, so statements must add `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: Option<&str>) -> String {
    let mut pattern = String::from("%");
    for c in query.unwrap_or("").chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// In-memory database with the current schema, for model tests
#[cfg(test)]
pub(crate) fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    crate::db::migrations::run_migrations(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(None), "%%");
        assert_eq!(contains_pattern(Some("veg")), "%veg%");
        assert_eq!(contains_pattern(Some("50%_off")), r"%50\%\_off%");
        assert_eq!(contains_pattern(Some(r"a\b")), r"%a\\b%");
    }
}
