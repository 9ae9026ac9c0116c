//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for account signup, login,
//! session lookup, and logout, parse request data, and interact with the
//! `auth::service` for core business logic.

use crate::api::common::AppJson;
use crate::auth::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::errors::ServiceError;
use crate::utils::cookie::{clear_session_cookie, session_cookie};
use crate::utils::jwt::Claims;
use axum::{
    extract::Extension,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json},
};
use sqlx::SqlitePool;

/// Handle account signup request
#[axum::debug_handler]
pub async fn signup(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let auth_service = AuthService::new(&pool, &config);
    let session = auth_service.signup(payload).await?;

    let cookie = session_cookie(
        &session.token,
        config.jwt_expires_in_seconds,
        config.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse { user: session.user }),
    ))
}

/// Handle login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let auth_service = AuthService::new(&pool, &config);
    let session = auth_service.login(payload).await?;

    let cookie = session_cookie(
        &session.token,
        config.jwt_expires_in_seconds,
        config.cookie_secure,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse { user: session.user }),
    ))
}

/// Get current user information from the verified session
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let auth_service = AuthService::new(&pool, &config);
    let user = auth_service.current_user(claims.user_id()).await?;

    Ok(Json(AuthResponse { user }))
}

/// Handle logout request by expiring the session cookie
#[axum::debug_handler]
pub async fn logout(Extension(config): Extension<Config>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(config.cookie_secure))],
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}
