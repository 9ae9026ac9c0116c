//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle endpoints like account signup, login, session lookup,
//! and logout. These are designed to be integrated into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(require_user)))
}
