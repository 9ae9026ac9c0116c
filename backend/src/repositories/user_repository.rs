//! Database repository for user management operations.
//!
//! Provides persistence operations for registered users.

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user with the learner role.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO carrying the already-hashed password
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'learner', ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by email, the login identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use crate::database::test_pool;
    use crate::repositories::is_unique_violation;

    fn sample_user() -> CreateUser {
        CreateUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$10$hash".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo.create_user(sample_user()).await.unwrap();
        assert_eq!(created.role, UserRole::Learner);
        assert_eq!(created.email, "ada@example.com");

        let by_id = repo.get_user_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Ada Lovelace");

        let by_email = repo
            .get_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(repo.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_hits_unique_constraint() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create_user(sample_user()).await.unwrap();
        let err = repo.create_user(sample_user()).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
