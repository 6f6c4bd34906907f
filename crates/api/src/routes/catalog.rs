use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Public catalog routes, merged at the API root.
///
/// ```text
/// GET /projects        -> list_projects
/// GET /projects/{id}   -> get_project
/// GET /categories      -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(catalog::list_projects))
        .route("/projects/{id}", get(catalog::get_project))
        .route("/categories", get(catalog::list_categories))
}
