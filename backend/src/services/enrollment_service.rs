//! Enrollment ledger business logic.
//!
//! Owns the at-most-one-enrollment-per-pair invariant and every progress
//! mutation; reads join ledger rows with course display data. Unlike the
//! catalog, the ledger has no degraded mode: it requires the store.

use crate::database::models::{
    Enrollment, EnrollmentStatus, EnrollmentView, UpdateProgressRequest,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::course_repository::CourseRepository;
use crate::repositories::enrollment_repository::EnrollmentRepository;
use crate::repositories::is_unique_violation;
use crate::services::validation_error;
use sqlx::SqlitePool;
use validator::Validate;

pub struct EnrollmentService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> EnrollmentService<'a> {
    /// Creates a new EnrollmentService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Enrolls a user in a course.
    ///
    /// The course-existence check is advisory; the unique pair constraint
    /// is what arbitrates concurrent duplicates, so two racing enrolls for
    /// the same pair resolve to one winner and one conflict.
    pub async fn enroll(&self, user_id: &str, course_id: &str) -> ServiceResult<Enrollment> {
        let courses = CourseRepository::new(self.pool);
        if courses.get_by_id(course_id).await?.is_none() {
            return Err(ServiceError::not_found("Course", course_id));
        }

        let repo = EnrollmentRepository::new(self.pool);
        match repo.create(user_id, course_id).await {
            Ok(enrollment) => Ok(enrollment),
            Err(err) if is_unique_violation(&err) => {
                Err(ServiceError::already_exists("Enrollment", course_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Updates progress on the caller's own enrollment.
    ///
    /// # Errors
    /// Returns `NotFound` both for an absent id and for a record owned by
    /// another user; the two cases are indistinguishable so ids cannot be
    /// probed for existence.
    pub async fn update_progress(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateProgressRequest,
    ) -> ServiceResult<Enrollment> {
        if let Err(validation_errors) = request.validate() {
            return Err(validation_error(validation_errors));
        }

        let repo = EnrollmentRepository::new(self.pool);
        repo.update_progress(
            id,
            user_id,
            request.progress,
            request.completed_lessons.as_deref(),
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("Enrollment", id))
    }

    /// Lists the caller's enrollments joined with course display data.
    pub async fn list_mine(&self, user_id: &str) -> ServiceResult<Vec<EnrollmentView>> {
        let repo = EnrollmentRepository::new(self.pool);
        let enrollments = repo.list_by_user(user_id).await?;

        let mut views = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let course = repo.course_ref(&enrollment.course_id).await?;
            views.push(EnrollmentView { enrollment, course });
        }

        Ok(views)
    }

    /// Non-failing probe for a user's enrollment in one course; absence is
    /// a normal result, not an error.
    pub async fn check(&self, user_id: &str, course_id: &str) -> ServiceResult<EnrollmentStatus> {
        let repo = EnrollmentRepository::new(self.pool);
        let enrollment = repo.find_by_user_and_course(user_id, course_id).await?;

        Ok(EnrollmentStatus {
            enrolled: enrollment.is_some(),
            enrollment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateCourse, Difficulty};
    use crate::database::test_pool;
    use crate::services::course_service::CourseService;

    async fn seeded_course(pool: &SqlitePool, title: &str) -> String {
        let course = CourseService::new(pool)
            .create(CreateCourse {
                title: title.into(),
                slug: None,
                description: "For enrollment tests.".into(),
                price: 0.0,
                category: "Development".into(),
                difficulty: Some(Difficulty::Beginner),
                thumbnail_url: None,
                lessons: vec![],
            })
            .await
            .unwrap();
        course.id
    }

    #[tokio::test]
    async fn test_enroll_requires_existing_course() {
        let pool = test_pool().await;
        let service = EnrollmentService::new(&pool);

        let err = service.enroll("user-1", "ghost-course").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_enroll_twice_conflicts() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Enrollable").await;
        let service = EnrollmentService::new(&pool);

        let enrollment = service.enroll("user-1", &course_id).await.unwrap();
        assert_eq!(enrollment.progress, 0.0);

        let err = service.enroll("user-1", &course_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_enrolls_resolve_to_one_winner() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Contended").await;
        let service = EnrollmentService::new(&pool);

        let (a, b, c, d) = tokio::join!(
            service.enroll("user-1", &course_id),
            service.enroll("user-1", &course_id),
            service.enroll("user-1", &course_id),
            service.enroll("user-1", &course_id),
        );

        let results = [a, b, c, d];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        for result in results {
            if let Err(err) = result {
                assert!(matches!(err, ServiceError::AlreadyExists { .. }));
            }
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE user_id = 'user-1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_update_progress_validates_range() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Progressive").await;
        let service = EnrollmentService::new(&pool);

        let enrollment = service.enroll("user-1", &course_id).await.unwrap();

        let err = service
            .update_progress(
                &enrollment.id,
                "user-1",
                UpdateProgressRequest {
                    progress: Some(150.0),
                    completed_lessons: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let updated = service
            .update_progress(
                &enrollment.id,
                "user-1",
                UpdateProgressRequest {
                    progress: Some(75.0),
                    completed_lessons: Some(vec!["lesson-1".into()]),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.progress, 75.0);
        assert_eq!(updated.completed_lessons, vec!["lesson-1"]);
    }

    #[tokio::test]
    async fn test_update_progress_by_non_owner_is_not_found() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Private").await;
        let service = EnrollmentService::new(&pool);

        let enrollment = service.enroll("owner", &course_id).await.unwrap();

        let err = service
            .update_progress(
                &enrollment.id,
                "intruder",
                UpdateProgressRequest {
                    progress: Some(100.0),
                    completed_lessons: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_mine_joins_course_display_data() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Joinable").await;
        let service = EnrollmentService::new(&pool);

        service.enroll("user-1", &course_id).await.unwrap();

        let views = service.list_mine("user-1").await.unwrap();
        assert_eq!(views.len(), 1);
        let course = views[0].course.as_ref().unwrap();
        assert_eq!(course.title, "Joinable");
        assert_eq!(course.slug, "joinable");
    }

    #[tokio::test]
    async fn test_check_reports_absence_without_error() {
        let pool = test_pool().await;
        let course_id = seeded_course(&pool, "Checkable").await;
        let service = EnrollmentService::new(&pool);

        let status = service.check("user-1", &course_id).await.unwrap();
        assert!(!status.enrolled);
        assert!(status.enrollment.is_none());

        service.enroll("user-1", &course_id).await.unwrap();

        let status = service.check("user-1", &course_id).await.unwrap();
        assert!(status.enrolled);
        assert!(status.enrollment.is_some());
    }
}
