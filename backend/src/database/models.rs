//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, together with the request and view shapes built from
//! them. Note that auth-specific models live in `crate::auth::models`.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role granted to a user account. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Learner,
    Admin,
}

/// Difficulty tier a course is labelled with. Stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a user row; the password is hashed before this
/// struct is built.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub difficulty: Difficulty,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(skip_serializing)]
    pub course_id: String,
    pub title: String,
    pub content_html: String,
    pub video_url: Option<String>,
    #[serde(rename = "order")]
    pub order_index: i64,
}

/// Lesson trimmed to what catalog list views and the degraded-mode catalog
/// expose: no content, no video reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonOutline {
    pub title: String,
    #[serde(rename = "order")]
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub progress: f64,
    pub completed_lessons: Vec<String>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw enrollment row as stored; `completed_lessons` is a JSON-encoded
/// array of lesson identifiers.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub progress: f64,
    pub completed_lessons: String,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrollmentRow {
    /// Decodes the stored JSON lesson set into the domain shape.
    pub fn into_enrollment(self) -> anyhow::Result<Enrollment> {
        let completed_lessons = serde_json::from_str(&self.completed_lessons)
            .context("Failed to decode completed lessons")?;
        Ok(Enrollment {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            progress: self.progress,
            completed_lessons,
            enrolled_at: self.enrolled_at,
            updated_at: self.updated_at,
        })
    }
}

/// Request body for creating a course. Slug and difficulty fall back to a
/// derived slug and `Beginner` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub price: f64,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub difficulty: Option<Difficulty>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub lessons: Vec<CreateLesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLesson {
    pub title: String,
    pub content_html: String,
    pub video_url: Option<String>,
    #[serde(rename = "order")]
    pub order_index: i64,
}

/// Partial update for a course; only provided fields are written. A provided
/// lesson list replaces the stored one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub thumbnail_url: Option<String>,
    pub lessons: Option<Vec<CreateLesson>>,
}

/// Optional filters accepted by the course list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseFilters {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
}

/// Course with its lessons trimmed to outlines, served by list views and by
/// every degraded-mode read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<LessonOutline>,
}

/// Course with its full lesson documents, served by the detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "Progress must be between 0 and 100"))]
    pub progress: Option<f64>,
    pub completed_lessons: Option<Vec<String>>,
}

/// The slice of course data an enrollment listing carries for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub thumbnail_url: Option<String>,
}

/// Enrollment joined with the display slice of its course. The course is
/// `None` for enrollments that outlived their course's deletion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Option<CourseRef>,
}

/// Non-failing probe result: absence of an enrollment is a normal outcome.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentStatus {
    pub enrolled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<Enrollment>,
}
