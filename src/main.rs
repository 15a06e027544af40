//! FoodBuddy
//!
//! A REST server for meal planning: tags, ingredients and recipes.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use foodbuddy::config::Config;
use foodbuddy::http::{build_router, AppState};
use foodbuddy::{build_info, db, seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodbuddy=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let config = Config::from_env()?;
    tracing::info!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::open_and_migrate(&config.database_path)?;

    if let Some(ref dir) = config.seed_dir {
        seed::import_dir(&database, dir)?;
    }

    let app = build_router(AppState::new(database, config.database_path.clone()));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
