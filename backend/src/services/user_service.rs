//! User business logic service.
//!
//! Handles registration and credential verification.

use crate::auth::models::SignupRequest;
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::is_unique_violation;
use crate::repositories::user_repository::UserRepository;
use crate::services::validation_error;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers a new learner account.
    ///
    /// # Arguments
    /// * `request` - Signup payload with the plain-text password
    ///
    /// # Returns
    /// The newly created User with all fields populated
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures and taken emails. A
    /// concurrent signup racing on the same email loses against the unique
    /// constraint and is reported as a taken email, not a server fault.
    pub async fn register(&self, request: SignupRequest) -> ServiceResult<User> {
        if let Err(validation_errors) = request.validate() {
            return Err(validation_error(validation_errors));
        }

        let repo = UserRepository::new(self.pool);

        if repo.get_user_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::already_exists("User", &request.email));
        }

        let password_hash = Self::hash_password(&request.password)?;

        let data = CreateUser {
            name: request.name,
            email: request.email.clone(),
            password_hash,
        };

        match repo.create_user(data).await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Err(ServiceError::already_exists("User", &request.email))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Checks login credentials, yielding the account when they match.
    ///
    /// An unknown email and a wrong password produce the same error so the
    /// response never reveals which of the two was wrong.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        let Some(user) = repo.get_user_by_email(email).await? else {
            return Err(ServiceError::validation("Invalid credentials"));
        };

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::validation("Invalid credentials"));
        }

        Ok(user)
    }

    /// Function to hash a password before storing in database
    ///
    /// # Arguments
    /// * `password` - Plain text password to hash
    ///
    /// # Returns
    /// Hashed password string
    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::validation(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    ///
    /// # Arguments
    /// * `password` - Plain text password to verify
    /// * `hash` - Stored password hash
    ///
    /// # Returns
    /// `true` if password matches hash, `false` otherwise
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash)
            .map_err(|e| ServiceError::validation(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use crate::database::test_pool;

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Grace Hopper".into(),
            email: email.into(),
            password: "compilers4ever".into(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_learner_with_hashed_password() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let user = service.register(signup("grace@example.com")).await.unwrap();
        assert_eq!(user.role, UserRole::Learner);
        assert_ne!(user.password_hash, "compilers4ever");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        service.register(signup("grace@example.com")).await.unwrap();
        let err = service
            .register(signup("grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let err = service.register(signup("not-an-email")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_verify_credentials_round_trip() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        service.register(signup("grace@example.com")).await.unwrap();

        let user = service
            .verify_credentials("grace@example.com", "compilers4ever")
            .await
            .unwrap();
        assert_eq!(user.email, "grace@example.com");

        let wrong_password = service
            .verify_credentials("grace@example.com", "cobol4ever")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, ServiceError::Validation { .. }));

        let unknown_email = service
            .verify_credentials("nobody@example.com", "compilers4ever")
            .await
            .unwrap_err();
        assert!(matches!(unknown_email, ServiceError::Validation { .. }));
    }
}
