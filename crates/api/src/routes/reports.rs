//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET    /reports                          -> list
/// POST   /reports                          -> create
/// GET    /reports/filter                   -> get_filtered
/// GET    /reports/by-request/{request_id}  -> get_by_request
/// GET    /reports/{id}                     -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(reports::list).post(reports::create))
        .route("/reports/filter", get(reports::get_filtered))
        .route(
            "/reports/by-request/{request_id}",
            get(reports::get_by_request),
        )
        .route("/reports/{id}", get(reports::get_by_id))
}
