//! Library crate for the EduPlatform backend.
//!
//! Exposes the application router builder so the server binary and the
//! integration tests share the exact same wiring: routes, middleware, and
//! the shared state layers.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;

use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use sqlx::SqlitePool;
use utils::jwt::JwtUtils;

/// Builds the full application router over the given pool and configuration.
pub fn app(pool: SqlitePool, config: Config) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/courses", api::course::routes::course_router())
        .nest("/enrollments", api::enrollment::routes::enrollment_router())
        .layer(Extension(pool))
        .layer(Extension(JwtUtils::new(&config)))
        .layer(Extension(config))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "EduPlatform Backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
