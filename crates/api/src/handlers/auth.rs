//! Handlers for the `/auth` resource (login, logout, current session).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::auth::identity::{Session, SessionUser};
use crate::error::AppResult;
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = state
        .identity
        .sign_in(input.email.trim(), &input.password)
        .await?;

    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented token.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    state.identity.sign_out(&auth.claims).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
///
/// The signed-in admin, or `null` when the request carries no usable token.
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<DataResponse<Option<SessionUser>>> {
    let user = state
        .identity
        .current_session(bearer_token(&headers))
        .await;

    Json(DataResponse { data: user })
}
