//! Database repository for course catalog operations.
//!
//! Courses and their lessons are written together; lessons are owned rows
//! that live and die with their course.

use crate::database::models::{
    Course, CourseFilters, CreateCourse, CreateLesson, Difficulty, Lesson, LessonOutline,
    UpdateCourse,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Repository for course database operations.
pub struct CourseRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CourseRepository<'a> {
    /// Creates a new CourseRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists courses matching the optional filters, newest first.
    ///
    /// Category and difficulty are exact matches; search is a
    /// case-insensitive substring match across title, description, and
    /// category.
    pub async fn list(&self, filters: &CourseFilters) -> Result<Vec<Course>> {
        let search_pattern = filters
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.trim()));

        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR difficulty = ?2)
              AND (?3 IS NULL OR title LIKE ?3 OR description LIKE ?3 OR category LIKE ?3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&filters.category)
        .bind(&filters.difficulty)
        .bind(&search_pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(courses)
    }

    /// Retrieves a course by its slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        Ok(course)
    }

    /// Retrieves a course by its unique identifier.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(course)
    }

    /// Fetches a course's full lesson documents in lesson order.
    pub async fn lessons(&self, course_id: &str) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT * FROM lessons WHERE course_id = ? ORDER BY order_index",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lessons)
    }

    /// Fetches a course's lessons trimmed to titles and order, for list
    /// views that never need lesson bodies.
    pub async fn lesson_outlines(&self, course_id: &str) -> Result<Vec<LessonOutline>> {
        let outlines = sqlx::query_as::<_, LessonOutline>(
            "SELECT title, order_index FROM lessons WHERE course_id = ? ORDER BY order_index",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(outlines)
    }

    /// Creates a course together with its lessons.
    ///
    /// # Arguments
    /// * `data` - Validated course payload
    /// * `slug` - Final slug, already derived from the title when absent
    ///
    /// # Returns
    /// The newly created Course row
    pub async fn create(&self, data: &CreateCourse, slug: &str) -> Result<Course> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (id, title, slug, description, price, category, difficulty, thumbnail_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(data.title.trim())
        .bind(slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(&data.category)
        .bind(data.difficulty.unwrap_or(Difficulty::Beginner))
        .bind(&data.thumbnail_url)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for lesson in &data.lessons {
            insert_lesson(&mut tx, &course.id, lesson).await?;
        }

        tx.commit().await?;
        Ok(course)
    }

    /// Applies a partial update to a course; only provided fields are
    /// written. A provided lesson list replaces the stored one wholesale.
    ///
    /// # Returns
    /// The updated Course, or `None` when no course has that id
    pub async fn update(&self, id: &str, patch: &UpdateCourse) -> Result<Option<Course>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET
                title = COALESCE(?, title),
                slug = COALESCE(?, slug),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                category = COALESCE(?, category),
                difficulty = COALESCE(?, difficulty),
                thumbnail_url = COALESCE(?, thumbnail_url),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.title.as_deref().map(str::trim))
        .bind(&patch.slug)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(&patch.category)
        .bind(patch.difficulty)
        .bind(&patch.thumbnail_url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(course) = updated else {
            return Ok(None);
        };

        if let Some(lessons) = &patch.lessons {
            sqlx::query("DELETE FROM lessons WHERE course_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for lesson in lessons {
                insert_lesson(&mut tx, &course.id, lesson).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(course))
    }

    /// Deletes a course; its lesson rows cascade with it.
    ///
    /// # Returns
    /// `true` if a row was deleted, `false` when no course has that id
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_lesson(
    tx: &mut Transaction<'_, Sqlite>,
    course_id: &str,
    lesson: &CreateLesson,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO lessons (id, course_id, title, content_html, video_url, order_index)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::now_v7().to_string())
    .bind(course_id)
    .bind(&lesson.title)
    .bind(&lesson.content_html)
    .bind(&lesson.video_url)
    .bind(lesson.order_index)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
