//! Defines the HTTP routes for the course catalog.
//!
//! Browsing is public; creation, updates, and deletion sit behind the admin
//! middleware. The admin methods address a course by id, sharing the route
//! parameter slot with the public by-slug lookup.

use super::handlers::{create_course, delete_course, get_course, list_courses, update_course};
use crate::auth::middleware::require_admin;
use axum::{Router, handler::Handler, middleware, routing::get};

pub fn course_router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_courses).post(create_course.layer(middleware::from_fn(require_admin))),
        )
        .route(
            "/{slug}",
            get(get_course)
                .put(update_course.layer(middleware::from_fn(require_admin)))
                .delete(delete_course.layer(middleware::from_fn(require_admin))),
        )
}
