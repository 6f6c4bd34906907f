//! Route definitions for the public gallery, mounted at `/gallery`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::gallery;
use crate::state::AppState;

/// ```text
/// GET    /                                       -> browse
/// POST   /sessions                               -> create_session
/// GET    /sessions/{id}                          -> get_session
/// DELETE /sessions/{id}                          -> delete_session
/// PUT    /sessions/{id}/filter                   -> update_filter
/// POST   /sessions/{id}/select                   -> select_project
/// POST   /sessions/{id}/close                    -> close_detail
/// POST   /sessions/{id}/favorites/{project_id}   -> toggle_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::browse))
        .route("/sessions", post(gallery::create_session))
        .route(
            "/sessions/{id}",
            get(gallery::get_session).delete(gallery::delete_session),
        )
        .route("/sessions/{id}/filter", put(gallery::update_filter))
        .route("/sessions/{id}/select", post(gallery::select_project))
        .route("/sessions/{id}/close", post(gallery::close_detail))
        .route(
            "/sessions/{id}/favorites/{project_id}",
            post(gallery::toggle_favorite),
        )
}
