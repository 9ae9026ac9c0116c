//! Core business logic for the authentication system.

use crate::auth::models::{LoginRequest, SignupRequest, UserInfo};
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::services::validation_error;
use crate::utils::jwt::JwtUtils;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for handling signup, login, and session lookup
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    user_service: UserService<'a>,
}

/// A signed-in session: the public user view plus its freshly minted token.
#[derive(Debug)]
pub struct Session {
    pub user: UserInfo,
    pub token: String,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            jwt_utils: JwtUtils::new(config),
            user_service: UserService::new(pool),
        }
    }

    /// Registers a new account and signs it in.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<Session> {
        let user = self.user_service.register(request).await?;
        let token = self.jwt_utils.generate_token(&user.id, user.role)?;

        Ok(Session {
            user: user.into(),
            token,
        })
    }

    /// Authenticates credentials and signs the account in.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<Session> {
        if let Err(validation_errors) = request.validate() {
            return Err(validation_error(validation_errors));
        }

        let user = self
            .user_service
            .verify_credentials(&request.email, &request.password)
            .await?;
        let token = self.jwt_utils.generate_token(&user.id, user.role)?;

        Ok(Session {
            user: user.into(),
            token,
        })
    }

    /// Resolves the current user for a verified token subject.
    ///
    /// A subject that no longer resolves is Unauthorized rather than
    /// NotFound: the token outlived its account.
    pub async fn current_user(&self, user_id: &str) -> ServiceResult<UserInfo> {
        let user = UserRepository::new(self.pool)
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Unauthorized"))?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use crate::database::test_pool;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "auth-service-test-secret".into(),
            jwt_expires_in_seconds: 604800,
            server_port: 0,
            cookie_secure: false,
        }
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            name: "Lin".into(),
            email: "lin@example.com".into(),
            password: "hunter2hunter2".into(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login_round_trip() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let session = service.signup(signup_request()).await.unwrap();
        assert_eq!(session.user.role, UserRole::Learner);
        assert!(!session.token.is_empty());

        let login = service
            .login(LoginRequest {
                email: "lin@example.com".into(),
                password: "hunter2hunter2".into(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);

        let me = service.current_user(&session.user.id).await.unwrap();
        assert_eq!(me.email, "lin@example.com");
    }

    #[tokio::test]
    async fn test_login_rejects_blank_fields() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let err = service
            .login(LoginRequest {
                email: String::new(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_current_user_for_unknown_subject_is_unauthorized() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let err = service.current_user("no-such-user").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }
}
