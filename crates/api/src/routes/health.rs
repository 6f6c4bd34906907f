use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::StoreBackend;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub backend: &'static str,
    /// Whether the database is reachable. Always `true` on the memory
    /// backend.
    pub db_healthy: bool,
    /// Live gallery sessions.
    pub gallery_sessions: usize,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match &state.pool {
        Some(pool) => muebles_db::health_check(pool).await.is_ok(),
        None => true,
    };

    let status = if db_healthy { "ok" } else { "degraded" };
    let backend = match state.config.store_backend {
        StoreBackend::Postgres => "postgres",
        StoreBackend::Memory => "memory",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend,
        db_healthy,
        gallery_sessions: state.galleries.session_count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
