//! Defines the HTTP routes for enrollments.
//!
//! Every enrollment endpoint requires a signed-in session.

use super::handlers::{check_enrollment, enroll, list_my_enrollments, update_progress};
use crate::auth::middleware::require_user;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn enrollment_router() -> Router {
    Router::new()
        .route("/", post(enroll).layer(middleware::from_fn(require_user)))
        .route(
            "/me",
            get(list_my_enrollments).layer(middleware::from_fn(require_user)),
        )
        .route(
            "/{id}/progress",
            put(update_progress).layer(middleware::from_fn(require_user)),
        )
        .route(
            "/check/{course_id}",
            get(check_enrollment).layer(middleware::from_fn(require_user)),
        )
}
