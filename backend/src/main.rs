//! Main entry point for the EduPlatform backend.
//!
//! This file initializes the Axum web server, sets up the database pool,
//! seeds the built-in course catalog on first run, and starts serving the
//! application router.

use backend::{app, catalog, config::Config, database::Database};
use tracing::{error, info};
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let pool = db.pool.clone();

    // Seeding failures are logged, not fatal; the catalog endpoints fall
    // back to the built-in dataset while the store is unavailable.
    if let Err(seed_error) = catalog::seed_builtin_courses(&pool).await {
        error!("Course seeding error: {:#}", seed_error);
    }

    let router = app(pool, config.clone());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting EduPlatform server on port {}", config.server_port);
    axum::serve(listener, router).await?;

    Ok(())
}
