//! Middleware for protecting authenticated routes and handling authorization.
//!
//! This module contains logic for validating session tokens and enforcing
//! role requirements across the API endpoints.

use crate::errors::ServiceError;
use crate::utils::cookie::session_token;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, extract::Request, middleware::Next, response::Response};

/// Session authentication middleware
pub async fn require_user(
    Extension(jwt_utils): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    // Extract the session cookie
    let token = session_token(request.headers())
        .ok_or_else(|| ServiceError::unauthorized("Unauthorized"))?;

    let claims = jwt_utils.validate_token(&token)?;

    // Add claims to request extensions for use in handlers
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin role authorization middleware
///
/// Verifies the session itself rather than relying on an earlier layer, so
/// admin routes stay protected no matter how they are composed.
pub async fn require_admin(
    Extension(jwt_utils): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = session_token(request.headers())
        .ok_or_else(|| ServiceError::unauthorized("Unauthorized"))?;

    let claims = jwt_utils.validate_token(&token)?;

    // Check if user has admin role
    if !claims.is_admin() {
        return Err(ServiceError::permission_denied("Admin access required"));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
