//! Database module
//!
//! Handles SQLite connection pooling and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Open the database at `path` and bring its schema up to date
pub fn open_and_migrate<P: AsRef<std::path::Path>>(path: P) -> DbResult<Database> {
    let database = Database::new(path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        tracing::debug!("Database schema version: {}", version);
        Ok::<_, DbError>(())
    })?;
    Ok(database)
}
