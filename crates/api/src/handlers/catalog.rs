//! Read-only public catalog: projects and categories.
//!
//! Every request runs a fresh gallery load, so these endpoints serve the
//! sample projects whenever the store is empty or unreachable.

use axum::extract::{Path, State};
use axum::Json;
use muebles_core::category::{CategoryFilter, FILTER_ALL_LABEL};
use muebles_core::error::CoreError;
use muebles_core::gallery::Gallery;
use muebles_core::project::Project;
use muebles_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// One entry of `GET /categories`.
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub count: usize,
}

async fn loaded_gallery(state: &AppState) -> Gallery {
    let mut gallery = Gallery::new();
    gallery.load(state.projects.as_ref()).await;
    gallery
}

/// GET /api/v1/projects
///
/// All displayable projects, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let gallery = loaded_gallery(&state).await;

    Ok(Json(DataResponse {
        data: gallery.engine().projects().to_vec(),
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let gallery = loaded_gallery(&state).await;
    let project = gallery
        .engine()
        .project(id)
        .cloned()
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;

    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/categories
///
/// Filter controls in display order (`all` first) with their counts.
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryInfo>>>> {
    let gallery = loaded_gallery(&state).await;
    let categories = gallery
        .engine()
        .category_tally()
        .entries()
        .map(|(filter, count)| CategoryInfo {
            id: filter.as_str(),
            label: match filter {
                CategoryFilter::All => FILTER_ALL_LABEL,
                CategoryFilter::Only(category) => category.label(),
            },
            count,
        })
        .collect();

    Ok(Json(DataResponse { data: categories }))
}
