//! Seed data import
//!
//! A seed directory holds `tags.json` (an array of tag names) and an
//! `ingredients/` tree of JSON files, each an array of ingredient objects.
//! Entries that already exist are skipped, as are ingredients whose unit is
//! not in the catalog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::models::{IngredientCreate, TagCreate};
use crate::service::{ingredients, tags, ApiError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Counts of what an import did
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SeedReport {
    pub tags_created: usize,
    pub tags_skipped: usize,
    pub ingredients_created: usize,
    pub ingredients_skipped: usize,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `*.json` file under `dir`, recursively, in path order
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, SeedError> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    let entries = fs::read_dir(dir).map_err(|source| SeedError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| SeedError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            files.extend(json_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Import tags and ingredients from `dir`. Missing files are not errors.
pub fn import_dir(db: &Database, dir: &Path) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let tags_path = dir.join("tags.json");
    if tags_path.is_file() {
        let names: Vec<String> = read_json(&tags_path)?;
        for name in names {
            match tags::create_tag(db, TagCreate { name: name.clone() }) {
                Ok(_) => report.tags_created += 1,
                Err(ApiError::BadRequest(reason)) => {
                    debug!("Skipping tag '{}': {}", name, reason);
                    report.tags_skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    for path in json_files(&dir.join("ingredients"))? {
        let items: Vec<IngredientCreate> = read_json(&path)?;
        for item in items {
            let name = item.name.clone();
            match ingredients::create_ingredient(db, item) {
                Ok(_) => report.ingredients_created += 1,
                Err(ApiError::BadRequest(reason)) => {
                    if reason.starts_with("Invalid unit") {
                        warn!("Skipping ingredient '{}' from {}: {}", name, path.display(), reason);
                    } else {
                        debug!("Skipping ingredient '{}': {}", name, reason);
                    }
                    report.ingredients_skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    info!(
        "Seeded {} tags ({} skipped), {} ingredients ({} skipped) from {}",
        report.tags_created,
        report.tags_skipped,
        report.ingredients_created,
        report.ingredients_skipped,
        dir.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use crate::service::test_support::test_db;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_import_skips_duplicates_and_bad_units() {
        let (_db_dir, db) = test_db();
        let seed = tempfile::tempdir().unwrap();

        write(&seed.path().join("tags.json"), r#"["dinner", "vegan", "dinner"]"#);
        write(
            &seed.path().join("ingredients/pantry.json"),
            r#"[
                {"name": "rice", "amount": 100, "unit": "g", "calories_kcal": 130},
                {"name": "mystery", "amount": 1, "unit": "handful"}
            ]"#,
        );
        write(
            &seed.path().join("ingredients/dairy/milk.json"),
            r#"[{"name": "milk", "amount": 1, "unit": "Cup", "protein_g": 8}]"#,
        );
        write(&seed.path().join("ingredients/README.txt"), "not json");

        let report = import_dir(&db, seed.path()).unwrap();
        assert_eq!(
            report,
            SeedReport {
                tags_created: 2,
                tags_skipped: 1,
                ingredients_created: 2,
                ingredients_skipped: 1,
            }
        );

        let milk = db
            .with_conn(|conn| Ingredient::get_by_name(conn, "milk"))
            .unwrap()
            .unwrap();
        assert_eq!(milk.unit.as_deref(), Some("cup"));
        assert_eq!(milk.nutrition.protein_g, 8.0);

        let again = import_dir(&db, seed.path()).unwrap();
        assert_eq!(again.tags_created, 0);
        assert_eq!(again.ingredients_created, 0);
        assert_eq!(again.ingredients_skipped, 3);
    }

    #[test]
    fn test_missing_directory_is_empty_import() {
        let (_db_dir, db) = test_db();
        let seed = tempfile::tempdir().unwrap();
        let report = import_dir(&db, &seed.path().join("nope")).unwrap();
        assert_eq!(report, SeedReport::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (_db_dir, db) = test_db();
        let seed = tempfile::tempdir().unwrap();
        write(&seed.path().join("tags.json"), "{not json");
        assert!(matches!(import_dir(&db, seed.path()), Err(SeedError::Parse { .. })));
    }
}
