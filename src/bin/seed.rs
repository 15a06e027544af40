//! Import a seed directory into the database
//!
//! Usage: `seed [DIR]`. DIR defaults to `FOODBUDDY_SEED_DIR`, then `data/seed`.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use foodbuddy::config::Config;
use foodbuddy::{db, seed};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodbuddy=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or(config.seed_dir)
        .unwrap_or_else(|| PathBuf::from("data/seed"));

    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = db::open_and_migrate(&config.database_path)?;

    let report = seed::import_dir(&database, &dir)?;
    println!("Imported from {}:", dir.display());
    println!("  Tags: {} created, {} skipped", report.tags_created, report.tags_skipped);
    println!(
        "  Ingredients: {} created, {} skipped",
        report.ingredients_created, report.ingredients_skipped
    );

    Ok(())
}
