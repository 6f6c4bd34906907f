//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use muebles_core::error::CoreError;
use muebles_core::types::DbId;

use crate::auth::jwt::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// The token in an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticated admin extracted from the `Authorization` header.
///
/// Rejects missing, malformed, expired and signed-out tokens with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub role: String,
    /// The decoded token, kept for sign-out.
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Err(CoreError::Unauthorized("Missing Authorization header".into()).into());
        }
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = state.identity.authenticate(token).await?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role.clone(),
            claims,
        })
    }
}
