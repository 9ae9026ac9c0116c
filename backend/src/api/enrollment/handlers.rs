//! Handler functions for enrollment API endpoints.
//!
//! All handlers run behind the session middleware and scope their queries
//! to the authenticated user taken from the verified claims, never from
//! the request payload.

use crate::api::common::AppJson;
use crate::database::models::{
    EnrollRequest, Enrollment, EnrollmentStatus, EnrollmentView, UpdateProgressRequest,
};
use crate::errors::ServiceError;
use crate::services::enrollment_service::EnrollmentService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sqlx::SqlitePool;

/// Enroll the current user into a course
#[axum::debug_handler]
pub async fn enroll(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<EnrollRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = EnrollmentService::new(&pool);
    let enrollment = service.enroll(claims.user_id(), &payload.course_id).await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// List the current user's enrollments
#[axum::debug_handler]
pub async fn list_my_enrollments(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<EnrollmentView>>, ServiceError> {
    let service = EnrollmentService::new(&pool);
    let enrollments = service.list_mine(claims.user_id()).await?;

    Ok(Json(enrollments))
}

/// Update progress on one of the current user's enrollments
#[axum::debug_handler]
pub async fn update_progress(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProgressRequest>,
) -> Result<Json<Enrollment>, ServiceError> {
    let service = EnrollmentService::new(&pool);
    let enrollment = service
        .update_progress(&id, claims.user_id(), payload)
        .await?;

    Ok(Json(enrollment))
}

/// Check whether the current user is enrolled in a course
#[axum::debug_handler]
pub async fn check_enrollment(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<Json<EnrollmentStatus>, ServiceError> {
    let service = EnrollmentService::new(&pool);
    let status = service.check(claims.user_id(), &course_id).await?;

    Ok(Json(status))
}
