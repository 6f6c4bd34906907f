pub mod admin;
pub mod auth;
pub mod catalog;
pub mod gallery;
pub mod health;

use axum::routing::post;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /gallery                                         one-shot browse (GET, ?category=&q=)
/// /gallery/sessions                                open session (POST)
/// /gallery/sessions/{id}                           snapshot, dispose (GET, DELETE)
/// /gallery/sessions/{id}/filter                    set category / search (PUT)
/// /gallery/sessions/{id}/select                    open detail view (POST)
/// /gallery/sessions/{id}/close                     close detail view (POST)
/// /gallery/sessions/{id}/favorites/{project_id}    toggle favorite (POST)
///
/// /projects                                        list (GET)
/// /projects/{id}                                   get (GET)
/// /categories                                      filter controls with counts (GET)
///
/// /inquiries                                       contact form (POST)
///
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/session                                    current session or null
///
/// /admin/projects                                  list, create (admin only)
/// /admin/projects/{id}                             get, update, delete
/// /admin/inquiries                                 list
/// /admin/inquiries/{id}                            delete
/// /admin/assets                                    upload (multipart POST), delete (DELETE {url})
/// /admin/stats                                     dashboard counters
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/gallery", gallery::router())
        .merge(catalog::router())
        .route("/inquiries", post(handlers::inquiries::submit_inquiry))
        .nest("/auth", auth::router())
        .nest("/admin", admin::router(config.max_upload_bytes))
}
