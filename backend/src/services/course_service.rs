//! Course catalog business logic.
//!
//! Normal reads come from the store; when the store is unreachable the read
//! paths fall back to the built-in catalog so browsing survives storage
//! outages. Writes never fall back.

use crate::catalog::{self, CatalogCourse};
use crate::database::models::{
    Course, CourseDetail, CourseFilters, CourseSummary, CreateCourse, UpdateCourse,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::course_repository::CourseRepository;
use crate::repositories::{is_store_unreachable, is_unique_violation};
use crate::services::validation_error;
use crate::utils::slug::slugify;
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

/// Course list payload: live rows, or the built-in catalog in degraded mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CourseList {
    Live(Vec<CourseSummary>),
    Builtin(Vec<CatalogCourse>),
}

/// Course detail payload: a live document, or its built-in outline in
/// degraded mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CourseView {
    Live(CourseDetail),
    Builtin(CatalogCourse),
}

pub struct CourseService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> CourseService<'a> {
    /// Creates a new CourseService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists courses matching the filters, lessons trimmed to outlines.
    ///
    /// Serves the built-in catalog when the store is unreachable; any other
    /// storage failure propagates.
    pub async fn list(&self, filters: &CourseFilters) -> ServiceResult<CourseList> {
        match self.list_live(filters).await {
            Ok(summaries) => Ok(CourseList::Live(summaries)),
            Err(err) if is_store_unreachable(&err) => {
                tracing::warn!("Course store unreachable, serving built-in catalog: {:#}", err);
                Ok(CourseList::Builtin(catalog::browse(filters)))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_live(&self, filters: &CourseFilters) -> anyhow::Result<Vec<CourseSummary>> {
        let repo = CourseRepository::new(self.pool);
        let courses = repo.list(filters).await?;

        let mut summaries = Vec::with_capacity(courses.len());
        for course in courses {
            let lessons = repo.lesson_outlines(&course.id).await?;
            summaries.push(CourseSummary { course, lessons });
        }

        Ok(summaries)
    }

    /// Fetches one course with full lesson content.
    ///
    /// The degraded fallback serves the built-in outline instead; a slug
    /// that is unknown in either mode is NotFound.
    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<CourseView> {
        match self.get_live(slug).await {
            Ok(Some(detail)) => Ok(CourseView::Live(detail)),
            Ok(None) => Err(ServiceError::not_found("Course", slug)),
            Err(err) if is_store_unreachable(&err) => {
                tracing::warn!("Course store unreachable, serving built-in catalog: {:#}", err);
                catalog::find_by_slug(slug)
                    .map(CourseView::Builtin)
                    .ok_or_else(|| ServiceError::not_found("Course", slug))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_live(&self, slug: &str) -> anyhow::Result<Option<CourseDetail>> {
        let repo = CourseRepository::new(self.pool);
        let Some(course) = repo.get_by_slug(slug).await? else {
            return Ok(None);
        };
        let lessons = repo.lessons(&course.id).await?;
        Ok(Some(CourseDetail { course, lessons }))
    }

    /// Creates a course, deriving the slug from the title when absent.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures and slug collisions.
    pub async fn create(&self, data: CreateCourse) -> ServiceResult<Course> {
        if let Err(validation_errors) = data.validate() {
            return Err(validation_error(validation_errors));
        }

        let slug = match &data.slug {
            Some(slug) => slug.clone(),
            None => slugify(&data.title),
        };
        if slug.is_empty() {
            return Err(ServiceError::validation("Slug cannot be empty"));
        }

        let repo = CourseRepository::new(self.pool);
        match repo.create(&data, &slug).await {
            Ok(course) => Ok(course),
            Err(err) if is_unique_violation(&err) => {
                Err(ServiceError::already_exists("Course", &slug))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Applies a partial update to a course.
    pub async fn update(&self, id: &str, patch: UpdateCourse) -> ServiceResult<Course> {
        let repo = CourseRepository::new(self.pool);
        match repo.update(id, &patch).await {
            Ok(Some(course)) => Ok(course),
            Ok(None) => Err(ServiceError::not_found("Course", id)),
            Err(err) if is_unique_violation(&err) => {
                Err(ServiceError::already_exists("Course", id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a course together with its lessons.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let repo = CourseRepository::new(self.pool);
        if repo.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Course", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_builtin_courses;
    use crate::database::test_pool;

    fn new_course(title: &str) -> CreateCourse {
        CreateCourse {
            title: title.into(),
            slug: None,
            description: "Hands-on exercises.".into(),
            price: 25.0,
            category: "Development".into(),
            difficulty: None,
            thumbnail_url: None,
            lessons: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_title() {
        let pool = test_pool().await;
        let service = CourseService::new(&pool);

        let course = service.create(new_course("Intro to Go!")).await.unwrap();
        assert_eq!(course.slug, "intro-to-go");

        let explicit = CreateCourse {
            slug: Some("my-own-slug".into()),
            ..new_course("Another Course")
        };
        let course = service.create(explicit).await.unwrap();
        assert_eq!(course.slug, "my-own-slug");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let pool = test_pool().await;
        let service = CourseService::new(&pool);

        service.create(new_course("Intro to Go!")).await.unwrap();
        let err = service.create(new_course("Intro to Go")).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_required_fields() {
        let pool = test_pool().await;
        let service = CourseService::new(&pool);

        let err = service.create(new_course("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_falls_back_when_store_is_unreachable() {
        let pool = test_pool().await;
        seed_builtin_courses(&pool).await.unwrap();
        let service = CourseService::new(&pool);

        let live = service.list(&CourseFilters::default()).await.unwrap();
        assert!(matches!(live, CourseList::Live(ref courses) if courses.len() == 4));

        pool.close().await;

        let degraded = service
            .list(&CourseFilters {
                category: Some("Design".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        match degraded {
            CourseList::Builtin(courses) => {
                assert_eq!(courses.len(), 1);
                assert_eq!(courses[0].category, "Design");
            }
            CourseList::Live(_) => panic!("expected built-in catalog"),
        }
    }

    #[tokio::test]
    async fn test_get_by_slug_live_and_degraded() {
        let pool = test_pool().await;
        seed_builtin_courses(&pool).await.unwrap();
        let service = CourseService::new(&pool);

        let live = service
            .get_by_slug("ui-ux-design-essentials")
            .await
            .unwrap();
        match live {
            CourseView::Live(detail) => {
                assert_eq!(detail.lessons.len(), 2);
                assert!(detail.lessons[0].content_html.contains("<p>"));
            }
            CourseView::Builtin(_) => panic!("expected live course"),
        }

        let missing = service.get_by_slug("no-such-slug").await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound { .. }));

        pool.close().await;

        let degraded = service
            .get_by_slug("ui-ux-design-essentials")
            .await
            .unwrap();
        assert!(matches!(degraded, CourseView::Builtin(_)));

        let missing = service.get_by_slug("no-such-slug").await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_course() {
        let pool = test_pool().await;
        let service = CourseService::new(&pool);

        let err = service
            .update("missing", UpdateCourse::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = service.delete("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
