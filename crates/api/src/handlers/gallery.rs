//! Handlers for the public gallery: one-shot browsing and hosted sessions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use muebles_core::error::CoreError;
use muebles_core::gallery::{Gallery, GallerySnapshot};
use muebles_core::types::DbId;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::gallery::SessionSnapshot;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /gallery` and `GET /admin/projects`.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Request body for `PUT /gallery/sessions/{id}/filter`. Absent fields keep
/// their current value.
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Request body for `POST /gallery/sessions/{id}/select`.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub project_id: DbId,
}

/// Apply optional category and search values to a gallery.
///
/// An unknown category is ignored by the engine, so the previous filter
/// stays in effect.
pub(crate) fn apply_filters(gallery: &mut Gallery, category: Option<&str>, search: Option<&str>) {
    if let Some(category) = category {
        gallery.set_category(category);
    }
    if let Some(search) = search {
        gallery.set_search_term(search);
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Gallery session {id}"))
}

// ---------------------------------------------------------------------------
// One-shot browsing
// ---------------------------------------------------------------------------

/// GET /api/v1/gallery
///
/// Load the projects (falling back to the sample set), apply `category` and
/// `q`, and return the resulting snapshot. Nothing is kept server-side.
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<GalleryQuery>,
) -> AppResult<Json<DataResponse<GallerySnapshot>>> {
    let mut gallery = Gallery::new();
    gallery.load(state.projects.as_ref()).await;
    apply_filters(&mut gallery, params.category.as_deref(), params.q.as_deref());

    Ok(Json(DataResponse {
        data: gallery.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// Hosted sessions
// ---------------------------------------------------------------------------

/// POST /api/v1/gallery/sessions
///
/// Create a gallery session and wait for its initial load. At the session
/// limit the least recently used idle session is dropped; 503 when every
/// session is busy.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (id, load) = state
        .galleries
        .create(std::sync::Arc::clone(&state.projects))
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;
    load.await
        .map_err(|e| AppError::InternalError(format!("Gallery load task failed: {e}")))?;

    let snapshot = state
        .galleries
        .snapshot(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    tracing::info!(
        session_id = %id,
        projects = snapshot.gallery.projects.len(),
        using_fallback = snapshot.gallery.using_fallback,
        "Gallery session opened",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /api/v1/gallery/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    let snapshot = state
        .galleries
        .snapshot(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(DataResponse { data: snapshot }))
}

/// PUT /api/v1/gallery/sessions/{id}/filter
///
/// Set the category filter and/or the search term.
pub async fn update_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FilterRequest>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    let gallery = state
        .galleries
        .with_session(id, |gallery| {
            apply_filters(gallery, input.category.as_deref(), input.search.as_deref());
            gallery.snapshot()
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(DataResponse {
        data: SessionSnapshot { id, gallery },
    }))
}

/// POST /api/v1/gallery/sessions/{id}/select
///
/// Open the detail view on a project.
pub async fn select_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SelectRequest>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    let gallery = state
        .galleries
        .with_session(id, |gallery| -> Result<GallerySnapshot, CoreError> {
            gallery.select(input.project_id)?;
            Ok(gallery.snapshot())
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(DataResponse {
        data: SessionSnapshot { id, gallery },
    }))
}

/// POST /api/v1/gallery/sessions/{id}/close
///
/// Close the detail view. Closing an already closed view is fine.
pub async fn close_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    let gallery = state
        .galleries
        .with_session(id, |gallery| {
            gallery.close();
            gallery.snapshot()
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(DataResponse {
        data: SessionSnapshot { id, gallery },
    }))
}

/// POST /api/v1/gallery/sessions/{id}/favorites/{project_id}
///
/// Flip the favorite mark on a project.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(Uuid, DbId)>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    let gallery = state
        .galleries
        .with_session(id, |gallery| -> Result<GallerySnapshot, CoreError> {
            gallery.toggle_favorite(project_id)?;
            Ok(gallery.snapshot())
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(DataResponse {
        data: SessionSnapshot { id, gallery },
    }))
}

/// DELETE /api/v1/gallery/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.galleries.remove(id).await {
        tracing::info!(session_id = %id, "Gallery session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}
