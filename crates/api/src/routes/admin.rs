//! Admin panel routes mounted at `/admin`. Every handler requires the
//! `admin` role.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET    /projects          -> list_projects
/// POST   /projects          -> create_project
/// GET    /projects/{id}     -> get_project
/// PUT    /projects/{id}     -> update_project
/// DELETE /projects/{id}     -> delete_project
/// GET    /inquiries         -> list_inquiries
/// DELETE /inquiries/{id}    -> delete_inquiry
/// POST   /assets            -> upload_assets (body capped at `max_upload_bytes`)
/// DELETE /assets            -> delete_asset
/// GET    /stats             -> get_stats
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(admin::list_projects).post(admin::create_project),
        )
        .route(
            "/projects/{id}",
            get(admin::get_project)
                .put(admin::update_project)
                .delete(admin::delete_project),
        )
        .route("/inquiries", get(admin::list_inquiries))
        .route("/inquiries/{id}", delete(admin::delete_inquiry))
        .route(
            "/assets",
            post(admin::upload_assets)
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .delete(admin::delete_asset),
        )
        .route("/stats", get(admin::get_stats))
}
