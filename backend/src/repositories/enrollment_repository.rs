//! Database repository for enrollment ledger operations.
//!
//! The unique (user_id, course_id) constraint is the source of truth for
//! the one-enrollment-per-pair invariant; all duplicate handling leans on
//! it instead of read-then-write checks.

use crate::database::models::{CourseRef, Enrollment, EnrollmentRow};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for enrollment database operations.
pub struct EnrollmentRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> EnrollmentRepository<'a> {
    /// Creates a new EnrollmentRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts an enrollment with zero progress.
    ///
    /// Under concurrent duplicate requests the unique pair constraint lets
    /// exactly one insert win; the losers surface a unique violation.
    pub async fn create(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            INSERT INTO enrollments (id, user_id, course_id, progress, completed_lessons, enrolled_at, updated_at)
            VALUES (?, ?, ?, 0, '[]', ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(course_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_enrollment()
    }

    /// Finds the enrollment a user holds for a course, if any.
    pub async fn find_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = ? AND course_id = ?",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(EnrollmentRow::into_enrollment).transpose()
    }

    /// Lists a user's enrollments, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = ? ORDER BY enrolled_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(EnrollmentRow::into_enrollment).collect()
    }

    /// Fetches the display slice of a course for enrollment listings.
    pub async fn course_ref(&self, course_id: &str) -> Result<Option<CourseRef>> {
        let course = sqlx::query_as::<_, CourseRef>(
            "SELECT id, title, slug, thumbnail_url FROM courses WHERE id = ?",
        )
        .bind(course_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(course)
    }

    /// Applies a progress update, keyed by id and owner together so a user
    /// can never reach another user's record by guessing its id.
    ///
    /// # Arguments
    /// * `progress` - New percentage, left unchanged when `None`
    /// * `completed_lessons` - Replacement lesson set, left unchanged when `None`
    ///
    /// # Returns
    /// The updated Enrollment, or `None` when no record matches (absent or
    /// owned by someone else; the two are indistinguishable on purpose)
    pub async fn update_progress(
        &self,
        id: &str,
        user_id: &str,
        progress: Option<f64>,
        completed_lessons: Option<&[String]>,
    ) -> Result<Option<Enrollment>> {
        let completed_json = completed_lessons
            .map(serde_json::to_string)
            .transpose()?;

        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            UPDATE enrollments SET
                progress = COALESCE(?, progress),
                completed_lessons = COALESCE(?, completed_lessons),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(progress)
        .bind(completed_json)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(EnrollmentRow::into_enrollment).transpose()
    }
}
