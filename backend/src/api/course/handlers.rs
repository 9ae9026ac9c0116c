//! Handler functions for course catalog API endpoints.
//!
//! The read endpoints are public and keep answering from the built-in
//! catalog when the store is unreachable. The write endpoints are reached
//! through the admin middleware only.

use crate::api::common::AppJson;
use crate::database::models::{Course, CourseFilters, CreateCourse, UpdateCourse};
use crate::errors::ServiceError;
use crate::services::course_service::{CourseList, CourseService, CourseView};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sqlx::SqlitePool;

/// List courses, optionally filtered by category, difficulty, or search term
#[axum::debug_handler]
pub async fn list_courses(
    Extension(pool): Extension<SqlitePool>,
    Query(filters): Query<CourseFilters>,
) -> Result<Json<CourseList>, ServiceError> {
    let service = CourseService::new(&pool);
    let courses = service.list(&filters).await?;

    Ok(Json(courses))
}

/// Get a single course by slug, including its lessons
#[axum::debug_handler]
pub async fn get_course(
    Extension(pool): Extension<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<Json<CourseView>, ServiceError> {
    let service = CourseService::new(&pool);
    let course = service.get_by_slug(&slug).await?;

    Ok(Json(course))
}

/// Create a new course
#[axum::debug_handler]
pub async fn create_course(
    Extension(pool): Extension<SqlitePool>,
    AppJson(payload): AppJson<CreateCourse>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = CourseService::new(&pool);
    let course = service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Update an existing course by id
#[axum::debug_handler]
pub async fn update_course(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateCourse>,
) -> Result<Json<Course>, ServiceError> {
    let service = CourseService::new(&pool);
    let course = service.update(&id, payload).await?;

    Ok(Json(course))
}

/// Delete a course by id
#[axum::debug_handler]
pub async fn delete_course(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let service = CourseService::new(&pool);
    service.delete(&id).await?;

    Ok(Json(serde_json::json!({ "message": "Course deleted" })))
}
