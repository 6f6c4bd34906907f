//! Admin panel handlers: project and inquiry management, image assets and
//! dashboard counters. Every handler requires the `admin` role.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use muebles_core::category::CategoryFilter;
use muebles_core::error::CoreError;
use muebles_core::gallery::AdminListing;
use muebles_core::inquiry::ContactInquiry;
use muebles_core::project::{NewProject, ProjectPatch, ProjectRecord};
use muebles_core::stats::SiteStats;
use muebles_core::types::DbId;
use muebles_core::validation::validate_input;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::gallery::GalleryQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `POST /admin/assets`.
#[derive(Debug, Serialize)]
pub struct UploadedAssets {
    pub urls: Vec<String>,
}

/// Request body for `DELETE /admin/assets`.
#[derive(Debug, Deserialize)]
pub struct DeleteAssetRequest {
    pub url: String,
}

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "project",
        id,
    })
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects
///
/// Every stored record passing `category` and `q`, newest first. Records the
/// public gallery skips are listed too, with a `problem`. There is no
/// fallback: an empty store lists nothing.
pub async fn list_projects(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<GalleryQuery>,
) -> AppResult<Json<DataResponse<AdminListing>>> {
    let records = state.projects.list().await?;

    let category = match params.category.as_deref() {
        None => CategoryFilter::All,
        Some(raw) => CategoryFilter::parse(raw).unwrap_or_else(|| {
            tracing::warn!(category = raw, "Ignoring unknown admin list category");
            CategoryFilter::All
        }),
    };
    let listing = AdminListing::build(records, category, params.q.as_deref().unwrap_or(""));

    if listing.skipped > 0 {
        tracing::debug!(skipped = listing.skipped, "Admin list includes undisplayable records");
    }

    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/admin/projects/{id}
///
/// The stored record as-is, including rows the public gallery would skip.
pub async fn get_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let project = state
        .projects
        .find(id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/projects
pub async fn create_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let project = state.projects.create(&input).await?;

    tracing::info!(
        project_id = project.id,
        category = %project.category,
        user_id = admin.user_id,
        "Project created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/admin/projects/{id}
pub async fn update_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectPatch>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    validate_input(&input)?;

    let project = state
        .projects
        .update(id, &input)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    tracing::info!(
        project_id = id,
        images = project.images.len(),
        user_id = admin.user_id,
        "Project updated",
    );

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
///
/// Removes the record only; its images stay in the asset store.
pub async fn delete_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.projects.delete(id).await? {
        return Err(project_not_found(id));
    }

    tracing::info!(project_id = id, user_id = admin.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/inquiries
///
/// All contact inquiries, newest first.
pub async fn list_inquiries(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ContactInquiry>>>> {
    let inquiries = state.inquiries.list().await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// DELETE /api/v1/admin/inquiries/{id}
pub async fn delete_inquiry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.inquiries.delete(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "inquiry",
            id,
        }));
    }

    tracing::info!(inquiry_id = id, user_id = admin.user_id, "Inquiry deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/assets
///
/// Store every file part of a multipart upload and return the public URLs
/// in upload order. Parts without a file name are ignored; non-image parts
/// are rejected.
pub async fn upload_assets(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedAssets>>)> {
    let limit = state.config.max_upload_bytes;
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(AppError::BadRequest(format!(
                    "'{file_name}' is not an image ({content_type})"
                )));
            }
        }

        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        if data.is_empty() {
            return Err(AppError::BadRequest(format!("'{file_name}' is empty")));
        }

        let url = state.assets.upload(data.to_vec(), &file_name).await?;
        tracing::debug!(url = %url, bytes = data.len(), "Asset stored");
        urls.push(url);
    }

    if urls.is_empty() {
        return Err(AppError::BadRequest(
            "No files received in multipart upload".to_string(),
        ));
    }

    tracing::info!(count = urls.len(), user_id = admin.user_id, "Assets uploaded");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedAssets { urls },
        }),
    ))
}

fn multipart_error(err: axum::extract::multipart::MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// DELETE /api/v1/admin/assets
///
/// Delete an uploaded image by its public URL.
pub async fn delete_asset(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DeleteAssetRequest>,
) -> AppResult<StatusCode> {
    if !state.assets.delete(&input.url).await? {
        return Err(AppError::NotFound(format!("Asset {}", input.url)));
    }

    tracing::info!(url = %input.url, user_id = admin.user_id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SiteStats>>> {
    let stats = SiteStats::collect(state.projects.as_ref(), state.inquiries.as_ref()).await?;
    Ok(Json(DataResponse { data: stats }))
}
